// Models module: persisted entities, request DTOs and projected responses

pub mod cluster;
pub mod ingress;
pub mod response;
pub mod service;

pub use cluster::*;
pub use ingress::*;
pub use response::*;
pub use service::*;

use crate::error::InventoryError;

pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), InventoryError> {
    if value.trim().is_empty() {
        return Err(InventoryError::BadRequest(format!("'{}' must not be empty", field)));
    }
    Ok(())
}

pub(crate) fn require_valid_ports(ports: &[i32]) -> Result<(), InventoryError> {
    match ports.iter().find(|p| !(1..=65535).contains(*p)) {
        Some(port) => Err(InventoryError::BadRequest(format!(
            "Port {} is outside the range 1-65535",
            port
        ))),
        None => Ok(()),
    }
}
