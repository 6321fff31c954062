//! Client side of the inventory: polls the snapshot endpoint and keeps a
//! filterable, per-cluster view of it.

pub mod filter;
pub mod poller;
pub mod render;
pub mod session;

pub use poller::{DashboardPoller, HttpSnapshotSource, PollerHandle, SharedSession, SnapshotSource};
pub use session::{CardState, ClusterView, DashboardSession, SessionStatus};
