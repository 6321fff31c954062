pub mod cluster_inventory;
pub mod ingress_inventory;
pub mod service_inventory;
pub mod uniqueness;
pub mod versions;

pub use cluster_inventory::ClusterInventory;
pub use ingress_inventory::IngressInventory;
pub use service_inventory::ServiceInventory;
