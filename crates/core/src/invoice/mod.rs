//! Canonical invoice record and the backend row adapter.

pub mod adapter;
pub mod error;
pub mod types;

pub use adapter::{StatusOverrides, VentaRecord, normalize, normalize_all, records_from_payload};
pub use error::InvoiceError;
pub use types::{Invoice, STATUS_UNMANAGED, STATUS_WON};
