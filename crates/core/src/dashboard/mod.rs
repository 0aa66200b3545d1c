//! Dashboard state: the current filter, the last accepted fetch, and local
//! status edits that have not reached the backend yet.

pub mod error;
pub mod store;
pub mod types;

pub use error::DashboardError;
pub use store::DashboardStore;
pub use types::{ChangeId, DashboardSnapshot, FetchTicket};
