//! Per-currency KPI aggregation.
//!
//! Invoices are filtered to a resolved period and summed per currency into
//! billed, won and available totals. Which statuses count as won or lost is
//! supplied by `StatusRules`; nothing here hard-codes a status vocabulary.

pub mod rules;
pub mod service;
pub mod summary;
pub mod types;


pub use rules::{StatusClass, StatusRules};
pub use service::{aggregate, compute_metrics};
pub use summary::metrics_from_summary;
pub use types::{CurrencyMetrics, MetricBucket};
