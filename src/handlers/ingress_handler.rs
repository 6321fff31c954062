use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::{info, warn};

use super::parse_body;
use crate::{
    error::InventoryError,
    models::{IngressCreateDto, IngressResponse},
    AppState,
};

pub async fn list_ingresses(
    State(state): State<AppState>,
) -> Result<Json<Vec<IngressResponse>>, InventoryError> {
    Ok(Json(state.ingress_inventory.list_all().await?))
}

pub async fn list_ingresses_by_cluster(
    State(state): State<AppState>,
    Path(cluster_name): Path<String>,
) -> Result<Json<Vec<IngressResponse>>, InventoryError> {
    let ingresses = state.ingress_inventory.list_by_cluster(&cluster_name).await?;
    info!("Found {} ingresses for cluster '{}'", ingresses.len(), cluster_name);
    Ok(Json(ingresses))
}

pub async fn get_ingress(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<IngressResponse>, InventoryError> {
    state
        .ingress_inventory
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| InventoryError::NotFound(format!("Ingress with ID {} not found", id)))
}

pub async fn create_ingress(
    State(state): State<AppState>,
    payload: Result<Json<IngressCreateDto>, JsonRejection>,
) -> Result<Response, InventoryError> {
    let dto = parse_body(payload)?;
    let (cluster_name, namespace, ingress_name) =
        (dto.cluster_name.clone(), dto.namespace.clone(), dto.ingress_name.clone());

    match state.ingress_inventory.create(dto).await {
        Ok(ingress) => {
            info!(
                "Created ingress {}/{} in cluster '{}' with id {}",
                namespace, ingress_name, cluster_name, ingress.id
            );
            let location = format!("/api/ingress/{}", ingress.id);
            Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(ingress)).into_response())
        }
        Err(e) => {
            warn!("Create ingress {}/{} in '{}' failed: {}", namespace, ingress_name, cluster_name, e);
            Err(e)
        }
    }
}

pub async fn update_ingress(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<IngressCreateDto>, JsonRejection>,
) -> Result<StatusCode, InventoryError> {
    let dto = parse_body(payload)?;

    match state.ingress_inventory.update(id, dto).await {
        Ok(_) => {
            info!("Updated ingress {}", id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            warn!("Update ingress {} failed: {}", id, e);
            Err(e)
        }
    }
}

pub async fn delete_ingress(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, InventoryError> {
    match state.ingress_inventory.delete(id).await {
        Ok(()) => {
            info!("Deleted ingress {}", id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            warn!("Delete ingress {} failed: {}", id, e);
            Err(e)
        }
    }
}
