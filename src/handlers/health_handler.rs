use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status_code, status, database) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "operational"),
        Err(e) => {
            warn!("Health check: database unreachable: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
        }
    };

    let health_data = json!({
        "status": status,
        "timestamp": Utc::now().timestamp(),
        "service": "cluster-inventory",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database
    });

    (status_code, Json(health_data))
}
