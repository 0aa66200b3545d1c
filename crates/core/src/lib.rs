//! KPI and grouping logic for the verificador dashboards.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Everything here is a function of its inputs except the dashboard store,
//! which is the single state container owned by the presentation layer.
//!
//! # Modules
//!
//! - `period` - Date filter descriptors and period resolution
//! - `invoice` - Canonical invoice record and backend row adapter
//! - `metrics` - Per-currency KPI aggregation and status classification
//! - `grouping` - Client/debtor/currency grouping and selection rules
//! - `dashboard` - Fetch generations and optimistic status edits
//! - `display` - Spanish month names and `es-PE` money formatting

pub mod dashboard;
pub mod display;
pub mod grouping;
pub mod invoice;
pub mod metrics;
pub mod period;

pub use grouping::{GroupKey, GroupedInvoices, InvoiceGroup, group_invoices};
pub use invoice::Invoice;
pub use metrics::{CurrencyMetrics, MetricBucket, StatusRules, compute_metrics};
pub use period::{DateFilter, Period, resolve_period};
