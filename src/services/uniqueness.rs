//! Pre-write identity checks.
//!
//! Writers run these checks inside [`crate::store::WriteTx`], which holds
//! the database write lock, so a second writer only gets here after the
//! first has committed and sees its rows. The unique indexes stay the last
//! word, and [`translate_write_error`] turns an index violation into the
//! same `Conflict` a failed check produces.

use sqlx::SqliteConnection;

use crate::error::InventoryError;
use crate::models::ClusterEntity;
use crate::store;

pub async fn ensure_cluster_name_available(
    conn: &mut SqliteConnection,
    cluster_name: &str,
    exclude_id: Option<i64>,
) -> Result<(), InventoryError> {
    match store::clusters::get_by_name(conn, cluster_name).await? {
        Some(existing) if Some(existing.id) != exclude_id => Err(InventoryError::Conflict(
            cluster_conflict_message(cluster_name),
        )),
        _ => Ok(()),
    }
}

/// Resolves the owning cluster of an ingress or service by name.
pub async fn resolve_cluster(
    conn: &mut SqliteConnection,
    cluster_name: &str,
) -> Result<ClusterEntity, InventoryError> {
    store::clusters::get_by_name(conn, cluster_name)
        .await?
        .ok_or_else(|| InventoryError::NotFound(format!("Cluster '{}' not found", cluster_name)))
}

pub async fn ensure_ingress_key_available(
    conn: &mut SqliteConnection,
    cluster: &ClusterEntity,
    namespace: &str,
    ingress_name: &str,
    exclude_id: Option<i64>,
) -> Result<(), InventoryError> {
    match store::ingresses::find_by_key(conn, cluster.id, namespace, ingress_name).await? {
        Some(existing) if Some(existing.id) != exclude_id => Err(InventoryError::Conflict(
            ingress_conflict_message(&cluster.cluster_name, namespace, ingress_name),
        )),
        _ => Ok(()),
    }
}

pub async fn ensure_service_key_available(
    conn: &mut SqliteConnection,
    cluster: &ClusterEntity,
    namespace: &str,
    service_name: &str,
    exclude_id: Option<i64>,
) -> Result<(), InventoryError> {
    match store::services::find_by_key(conn, cluster.id, namespace, service_name).await? {
        Some(existing) if Some(existing.id) != exclude_id => Err(InventoryError::Conflict(
            service_conflict_message(&cluster.cluster_name, namespace, service_name),
        )),
        _ => Ok(()),
    }
}

/// Maps a failed write or commit onto the error taxonomy.
///
/// Unique index violations become `Conflict` with the supplied message, a
/// foreign key violation means the owning cluster vanished mid-operation
/// and becomes `NotFound`. Everything else stays a store fault.
pub fn translate_write_error(err: sqlx::Error, conflict_message: impl FnOnce() -> String) -> InventoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            InventoryError::Conflict(conflict_message())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            InventoryError::NotFound("Owning cluster no longer exists".to_string())
        }
        _ => InventoryError::Store(err),
    }
}

pub fn cluster_conflict_message(cluster_name: &str) -> String {
    format!("A cluster with name '{}' already exists", cluster_name)
}

pub fn ingress_conflict_message(cluster_name: &str, namespace: &str, ingress_name: &str) -> String {
    format!(
        "Ingress '{}' already exists in namespace '{}' for cluster '{}'",
        ingress_name, namespace, cluster_name
    )
}

pub fn service_conflict_message(cluster_name: &str, namespace: &str, service_name: &str) -> String {
    format!(
        "Service '{}' already exists in namespace '{}' for cluster '{}'",
        service_name, namespace, cluster_name
    )
}
