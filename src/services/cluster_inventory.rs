use crate::error::InventoryError;
use crate::models::{ClusterCreateDto, ClusterResponse};
use crate::projector;
use crate::services::uniqueness::{self, cluster_conflict_message};
use crate::services::versions::dedup_versions;
use crate::store::{self, clusters::ClusterFields, Store};

/// Cluster reads and writes. Each call runs in its own transaction.
#[derive(Clone)]
pub struct ClusterInventory {
    store: Store,
}

impl ClusterInventory {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Every cluster with its ingresses and services embedded.
    pub async fn list_all(&self) -> Result<Vec<ClusterResponse>, InventoryError> {
        let mut tx = self.store.begin().await?;
        let clusters = store::clusters::list(&mut *tx).await?;
        let ingresses = store::ingresses::list(&mut *tx).await?;
        let services = store::services::list(&mut *tx).await?;
        tx.commit().await?;

        Ok(projector::project_snapshot(&clusters, &ingresses, &services))
    }

    /// Zero or one clusters, since cluster names are unique.
    pub async fn list_by_cluster(&self, cluster_name: &str) -> Result<Vec<ClusterResponse>, InventoryError> {
        Ok(self.get_by_name(cluster_name).await?.into_iter().collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<ClusterResponse>, InventoryError> {
        let mut tx = self.store.begin().await?;
        let cluster = match store::clusters::get(&mut *tx, id).await? {
            Some(cluster) => cluster,
            None => return Ok(None),
        };
        let ingresses = store::ingresses::list_by_cluster_id(&mut *tx, cluster.id).await?;
        let services = store::services::list_by_cluster_id(&mut *tx, cluster.id).await?;
        tx.commit().await?;

        Ok(Some(projector::project_cluster(&cluster, &ingresses, &services)))
    }

    pub async fn get_by_name(&self, cluster_name: &str) -> Result<Option<ClusterResponse>, InventoryError> {
        let mut tx = self.store.begin().await?;
        let cluster = match store::clusters::get_by_name(&mut *tx, cluster_name).await? {
            Some(cluster) => cluster,
            None => return Ok(None),
        };
        let ingresses = store::ingresses::list_by_cluster_id(&mut *tx, cluster.id).await?;
        let services = store::services::list_by_cluster_id(&mut *tx, cluster.id).await?;
        tx.commit().await?;

        Ok(Some(projector::project_cluster(&cluster, &ingresses, &services)))
    }

    pub async fn create(&self, dto: ClusterCreateDto) -> Result<ClusterResponse, InventoryError> {
        dto.validate()?;

        let mut tx = self.store.begin_write().await?;
        let conn = tx.conn()?;
        uniqueness::ensure_cluster_name_available(&mut *conn, &dto.cluster_name, None).await?;

        let kubelet_versions = dedup_versions(dto.kubelet_versions);
        let kernel_versions = dedup_versions(dto.kernel_versions);
        let fields = ClusterFields {
            cluster_name: &dto.cluster_name,
            apiserver_version: &dto.apiserver_version,
            kubelet_versions: &kubelet_versions,
            kernel_versions: &kernel_versions,
        };

        let conflict = || cluster_conflict_message(&dto.cluster_name);
        let cluster = store::clusters::insert(&mut *conn, fields)
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?;
        tx.commit()
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?;

        Ok(projector::project_cluster(&cluster, &[], &[]))
    }

    /// Replaces name, API server version and both version sets.
    pub async fn update(&self, id: i64, dto: ClusterCreateDto) -> Result<ClusterResponse, InventoryError> {
        dto.validate()?;

        let mut tx = self.store.begin_write().await?;
        let conn = tx.conn()?;
        if store::clusters::get(&mut *conn, id).await?.is_none() {
            return Err(not_found(id));
        }
        uniqueness::ensure_cluster_name_available(&mut *conn, &dto.cluster_name, Some(id)).await?;

        let kubelet_versions = dedup_versions(dto.kubelet_versions);
        let kernel_versions = dedup_versions(dto.kernel_versions);
        let fields = ClusterFields {
            cluster_name: &dto.cluster_name,
            apiserver_version: &dto.apiserver_version,
            kubelet_versions: &kubelet_versions,
            kernel_versions: &kernel_versions,
        };

        let conflict = || cluster_conflict_message(&dto.cluster_name);
        let cluster = store::clusters::update(&mut *conn, id, fields)
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?
            .ok_or_else(|| not_found(id))?;
        let ingresses = store::ingresses::list_by_cluster_id(&mut *conn, id).await?;
        let services = store::services::list_by_cluster_id(&mut *conn, id).await?;
        tx.commit()
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?;

        Ok(projector::project_cluster(&cluster, &ingresses, &services))
    }

    /// Deletes the cluster and, in the same transaction, all its children.
    pub async fn delete(&self, id: i64) -> Result<(), InventoryError> {
        let mut tx = self.store.begin_write().await?;
        let conn = tx.conn()?;
        if !store::clusters::delete_cascade(&mut *conn, id).await? {
            return Err(not_found(id));
        }
        tx.commit().await?;
        Ok(())
    }
}

fn not_found(id: i64) -> InventoryError {
    InventoryError::NotFound(format!("Cluster with ID {} not found", id))
}
