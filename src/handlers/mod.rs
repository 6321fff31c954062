pub mod cluster_handler;
pub mod health_handler;
pub mod ingress_handler;
pub mod service_handler;

use axum::{extract::rejection::JsonRejection, response::Json};
use tracing::warn;

use crate::error::InventoryError;

/// Unwraps a JSON body, turning axum's rejection into a 400.
pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, InventoryError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let reason = rejection.body_text();
            warn!("Rejected request body: {}", reason);
            Err(InventoryError::BadRequest(reason))
        }
    }
}
