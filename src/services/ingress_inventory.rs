use crate::error::InventoryError;
use crate::models::{IngressCreateDto, IngressResponse};
use crate::projector::{self, ClusterIndex};
use crate::services::uniqueness::{self, ingress_conflict_message};
use crate::store::{self, ingresses::IngressFields, Store};

#[derive(Clone)]
pub struct IngressInventory {
    store: Store,
}

impl IngressInventory {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<IngressResponse>, InventoryError> {
        let mut tx = self.store.begin().await?;
        let ingresses = store::ingresses::list(&mut *tx).await?;
        let index = ClusterIndex::new(store::clusters::names(&mut *tx).await?);
        tx.commit().await?;

        Ok(projector::project_ingresses(&ingresses, &index))
    }

    /// Ingresses owned by the named cluster; empty when the cluster is unknown.
    pub async fn list_by_cluster(&self, cluster_name: &str) -> Result<Vec<IngressResponse>, InventoryError> {
        let mut conn = self.store.acquire().await?;
        let ingresses = store::ingresses::list_by_cluster_name(&mut *conn, cluster_name).await?;

        Ok(ingresses
            .iter()
            .map(|ingress| projector::project_ingress(ingress, cluster_name))
            .collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<IngressResponse>, InventoryError> {
        let mut tx = self.store.begin().await?;
        let ingress = match store::ingresses::get(&mut *tx, id).await? {
            Some(ingress) => ingress,
            None => return Ok(None),
        };
        let cluster = store::clusters::get(&mut *tx, ingress.cluster_id).await?;
        tx.commit().await?;

        Ok(cluster.map(|cluster| projector::project_ingress(&ingress, &cluster.cluster_name)))
    }

    pub async fn create(&self, dto: IngressCreateDto) -> Result<IngressResponse, InventoryError> {
        dto.validate()?;

        let mut tx = self.store.begin_write().await?;
        let conn = tx.conn()?;
        let cluster = uniqueness::resolve_cluster(&mut *conn, &dto.cluster_name).await?;
        uniqueness::ensure_ingress_key_available(&mut *conn, &cluster, &dto.namespace, &dto.ingress_name, None)
            .await?;

        let fields = IngressFields {
            cluster_id: cluster.id,
            namespace: &dto.namespace,
            ingress_name: &dto.ingress_name,
            hosts: &dto.hosts,
            ports: &dto.ports,
        };

        let conflict = || ingress_conflict_message(&cluster.cluster_name, &dto.namespace, &dto.ingress_name);
        let ingress = store::ingresses::insert(&mut *conn, fields)
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?;
        tx.commit()
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?;

        Ok(projector::project_ingress(&ingress, &cluster.cluster_name))
    }

    /// Full replace; the ingress may move to another cluster.
    pub async fn update(&self, id: i64, dto: IngressCreateDto) -> Result<IngressResponse, InventoryError> {
        dto.validate()?;

        let mut tx = self.store.begin_write().await?;
        let conn = tx.conn()?;
        if store::ingresses::get(&mut *conn, id).await?.is_none() {
            return Err(not_found(id));
        }
        let cluster = uniqueness::resolve_cluster(&mut *conn, &dto.cluster_name).await?;
        uniqueness::ensure_ingress_key_available(&mut *conn, &cluster, &dto.namespace, &dto.ingress_name, Some(id))
            .await?;

        let fields = IngressFields {
            cluster_id: cluster.id,
            namespace: &dto.namespace,
            ingress_name: &dto.ingress_name,
            hosts: &dto.hosts,
            ports: &dto.ports,
        };

        let conflict = || ingress_conflict_message(&cluster.cluster_name, &dto.namespace, &dto.ingress_name);
        let ingress = store::ingresses::update(&mut *conn, id, fields)
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?
            .ok_or_else(|| not_found(id))?;
        tx.commit()
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?;

        Ok(projector::project_ingress(&ingress, &cluster.cluster_name))
    }

    pub async fn delete(&self, id: i64) -> Result<(), InventoryError> {
        let mut tx = self.store.begin_write().await?;
        let conn = tx.conn()?;
        if !store::ingresses::delete(&mut *conn, id).await? {
            return Err(not_found(id));
        }
        tx.commit().await?;
        Ok(())
    }
}

fn not_found(id: i64) -> InventoryError {
    InventoryError::NotFound(format!("Ingress with ID {} not found", id))
}
