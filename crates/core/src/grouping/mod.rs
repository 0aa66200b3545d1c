//! Client/debtor/currency grouping for the invoice list.
//!
//! Groups keep first-seen order and carry their members, so flattening the
//! groups gives back every input invoice exactly once.

pub mod selection;
pub mod service;
pub mod types;


pub use selection::{CheckState, Selection};
pub use service::group_invoices;
pub use types::{GroupKey, GroupedInvoices, InvoiceGroup};
