use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::{info, warn};

use super::parse_body;
use crate::{
    error::InventoryError,
    models::{ServiceCreateDto, ServiceResponse},
    AppState,
};

pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, InventoryError> {
    Ok(Json(state.service_inventory.list_all().await?))
}

pub async fn list_services_by_cluster(
    State(state): State<AppState>,
    Path(cluster_name): Path<String>,
) -> Result<Json<Vec<ServiceResponse>>, InventoryError> {
    let services = state.service_inventory.list_by_cluster(&cluster_name).await?;
    info!("Found {} services for cluster '{}'", services.len(), cluster_name);
    Ok(Json(services))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceResponse>, InventoryError> {
    state
        .service_inventory
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| InventoryError::NotFound(format!("Service with ID {} not found", id)))
}

pub async fn create_service(
    State(state): State<AppState>,
    payload: Result<Json<ServiceCreateDto>, JsonRejection>,
) -> Result<Response, InventoryError> {
    let dto = parse_body(payload)?;
    let (cluster_name, namespace, service_name) =
        (dto.cluster_name.clone(), dto.namespace.clone(), dto.service_name.clone());

    match state.service_inventory.create(dto).await {
        Ok(service) => {
            info!(
                "Created service {}/{} in cluster '{}' with id {}",
                namespace, service_name, cluster_name, service.id
            );
            let location = format!("/api/service/{}", service.id);
            Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(service)).into_response())
        }
        Err(e) => {
            warn!("Create service {}/{} in '{}' failed: {}", namespace, service_name, cluster_name, e);
            Err(e)
        }
    }
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ServiceCreateDto>, JsonRejection>,
) -> Result<StatusCode, InventoryError> {
    let dto = parse_body(payload)?;

    match state.service_inventory.update(id, dto).await {
        Ok(_) => {
            info!("Updated service {}", id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            warn!("Update service {} failed: {}", id, e);
            Err(e)
        }
    }
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, InventoryError> {
    match state.service_inventory.delete(id).await {
        Ok(()) => {
            info!("Deleted service {}", id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            warn!("Delete service {} failed: {}", id, e);
            Err(e)
        }
    }
}
