use crate::error::InventoryError;
use crate::models::{ServiceCreateDto, ServiceResponse};
use crate::projector::{self, ClusterIndex};
use crate::services::uniqueness::{self, service_conflict_message};
use crate::store::{self, services::ServiceFields, Store};

/// Inventory of Kubernetes Service objects (not to be confused with the
/// inventories themselves).
#[derive(Clone)]
pub struct ServiceInventory {
    store: Store,
}

impl ServiceInventory {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<ServiceResponse>, InventoryError> {
        let mut tx = self.store.begin().await?;
        let services = store::services::list(&mut *tx).await?;
        let index = ClusterIndex::new(store::clusters::names(&mut *tx).await?);
        tx.commit().await?;

        Ok(projector::project_services(&services, &index))
    }

    pub async fn list_by_cluster(&self, cluster_name: &str) -> Result<Vec<ServiceResponse>, InventoryError> {
        let mut conn = self.store.acquire().await?;
        let services = store::services::list_by_cluster_name(&mut *conn, cluster_name).await?;

        Ok(services
            .iter()
            .map(|service| projector::project_service(service, cluster_name))
            .collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<ServiceResponse>, InventoryError> {
        let mut tx = self.store.begin().await?;
        let service = match store::services::get(&mut *tx, id).await? {
            Some(service) => service,
            None => return Ok(None),
        };
        let cluster = store::clusters::get(&mut *tx, service.cluster_id).await?;
        tx.commit().await?;

        Ok(cluster.map(|cluster| projector::project_service(&service, &cluster.cluster_name)))
    }

    pub async fn create(&self, dto: ServiceCreateDto) -> Result<ServiceResponse, InventoryError> {
        dto.validate()?;

        let mut tx = self.store.begin_write().await?;
        let conn = tx.conn()?;
        let cluster = uniqueness::resolve_cluster(&mut *conn, &dto.cluster_name).await?;
        uniqueness::ensure_service_key_available(&mut *conn, &cluster, &dto.namespace, &dto.service_name, None)
            .await?;

        let external_ip = dto.normalized_external_ip();
        let fields = ServiceFields {
            cluster_id: cluster.id,
            namespace: &dto.namespace,
            service_name: &dto.service_name,
            external_ip: external_ip.as_deref(),
            ports: &dto.ports,
            service_type: dto.service_type,
        };

        let conflict = || service_conflict_message(&cluster.cluster_name, &dto.namespace, &dto.service_name);
        let service = store::services::insert(&mut *conn, fields)
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?;
        tx.commit()
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?;

        Ok(projector::project_service(&service, &cluster.cluster_name))
    }

    pub async fn update(&self, id: i64, dto: ServiceCreateDto) -> Result<ServiceResponse, InventoryError> {
        dto.validate()?;

        let mut tx = self.store.begin_write().await?;
        let conn = tx.conn()?;
        if store::services::get(&mut *conn, id).await?.is_none() {
            return Err(not_found(id));
        }
        let cluster = uniqueness::resolve_cluster(&mut *conn, &dto.cluster_name).await?;
        uniqueness::ensure_service_key_available(&mut *conn, &cluster, &dto.namespace, &dto.service_name, Some(id))
            .await?;

        let external_ip = dto.normalized_external_ip();
        let fields = ServiceFields {
            cluster_id: cluster.id,
            namespace: &dto.namespace,
            service_name: &dto.service_name,
            external_ip: external_ip.as_deref(),
            ports: &dto.ports,
            service_type: dto.service_type,
        };

        let conflict = || service_conflict_message(&cluster.cluster_name, &dto.namespace, &dto.service_name);
        let service = store::services::update(&mut *conn, id, fields)
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?
            .ok_or_else(|| not_found(id))?;
        tx.commit()
            .await
            .map_err(|e| uniqueness::translate_write_error(e, conflict))?;

        Ok(projector::project_service(&service, &cluster.cluster_name))
    }

    pub async fn delete(&self, id: i64) -> Result<(), InventoryError> {
        let mut tx = self.store.begin_write().await?;
        let conn = tx.conn()?;
        if !store::services::delete(&mut *conn, id).await? {
            return Err(not_found(id));
        }
        tx.commit().await?;
        Ok(())
    }
}

fn not_found(id: i64) -> InventoryError {
    InventoryError::NotFound(format!("Service with ID {} not found", id))
}
