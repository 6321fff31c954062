use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::{info, warn};

use super::parse_body;
use crate::{
    error::InventoryError,
    models::{ClusterCreateDto, ClusterResponse},
    AppState,
};

/// GET /api/clusters
/// Full nested snapshot; this is what the dashboard polls.
pub async fn list_clusters(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClusterResponse>>, InventoryError> {
    let clusters = state.cluster_inventory.list_all().await?;
    info!("Listed {} clusters", clusters.len());
    Ok(Json(clusters))
}

/// GET /api/clusters/:id
pub async fn get_cluster(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClusterResponse>, InventoryError> {
    match state.cluster_inventory.get_by_id(id).await? {
        Some(cluster) => Ok(Json(cluster)),
        None => {
            warn!("Cluster {} not found", id);
            Err(InventoryError::NotFound(format!("Cluster with ID {} not found", id)))
        }
    }
}

/// GET /api/clusters/name/:name
pub async fn get_cluster_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClusterResponse>, InventoryError> {
    match state.cluster_inventory.get_by_name(&name).await? {
        Some(cluster) => Ok(Json(cluster)),
        None => {
            warn!("Cluster '{}' not found", name);
            Err(InventoryError::NotFound(format!("Cluster '{}' not found", name)))
        }
    }
}

/// POST /api/clusters
pub async fn create_cluster(
    State(state): State<AppState>,
    payload: Result<Json<ClusterCreateDto>, JsonRejection>,
) -> Result<Response, InventoryError> {
    let dto = parse_body(payload)?;
    let cluster_name = dto.cluster_name.clone();

    match state.cluster_inventory.create(dto).await {
        Ok(cluster) => {
            info!("Created cluster '{}' with id {}", cluster.cluster_name, cluster.id);
            let location = format!("/api/clusters/{}", cluster.id);
            Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(cluster)).into_response())
        }
        Err(e) => {
            warn!("Create cluster '{}' failed: {}", cluster_name, e);
            Err(e)
        }
    }
}

/// PUT /api/clusters/:id
pub async fn update_cluster(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ClusterCreateDto>, JsonRejection>,
) -> Result<StatusCode, InventoryError> {
    let dto = parse_body(payload)?;

    match state.cluster_inventory.update(id, dto).await {
        Ok(cluster) => {
            info!("Updated cluster {} ('{}')", id, cluster.cluster_name);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            warn!("Update cluster {} failed: {}", id, e);
            Err(e)
        }
    }
}

/// DELETE /api/clusters/:id
/// Removes the cluster together with its ingresses and services.
pub async fn delete_cluster(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, InventoryError> {
    match state.cluster_inventory.delete(id).await {
        Ok(()) => {
            info!("Deleted cluster {}", id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            warn!("Delete cluster {} failed: {}", id, e);
            Err(e)
        }
    }
}
