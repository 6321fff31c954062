use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Failure taxonomy shared by the inventory services and the HTTP layer.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    /// Anything the store reports that is not a uniqueness or reference problem.
    #[error("store failure: {0}")]
    Store(#[from] sqlx::Error),
}

impl InventoryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
            InventoryError::Conflict(_) => StatusCode::CONFLICT,
            InventoryError::BadRequest(_) => StatusCode::BAD_REQUEST,
            InventoryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InventoryError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, InventoryError::Conflict(_))
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            InventoryError::NotFound(message) => ErrorResponse {
                error: "Not Found".to_string(),
                message: Some(message.clone()),
            },
            InventoryError::Conflict(message) => ErrorResponse {
                error: "Conflict".to_string(),
                message: Some(message.clone()),
            },
            InventoryError::BadRequest(message) => ErrorResponse {
                error: "Bad Request".to_string(),
                message: Some(message.clone()),
            },
            InventoryError::Store(e) => {
                error!("Unhandled store failure: {}", e);
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    message: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
