use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Tags every request with an id (the caller's, or a fresh v4 UUID), echoes
/// it back on the response and logs the outcome.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let header_value = match HeaderValue::from_str(&request_id) {
        Ok(value) => value,
        Err(_) => {
            // Caller sent something unprintable; replace it
            let fresh = Uuid::new_v4().to_string();
            warn!("Replacing invalid request id with {}", fresh);
            HeaderValue::from_str(&fresh).unwrap_or_else(|_| HeaderValue::from_static("invalid"))
        }
    };
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, header_value.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        warn!(request_id = ?header_value, %method, %path, status = status.as_u16(), elapsed_ms, "request failed");
    } else {
        info!(request_id = ?header_value, %method, %path, status = status.as_u16(), elapsed_ms, "request completed");
    }

    response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    response
}
