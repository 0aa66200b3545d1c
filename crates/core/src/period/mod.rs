//! Date filter descriptors and period resolution.
//!
//! A `DateFilter` is what the user picked in the period selector; a `Period`
//! is the concrete inclusive date interval and label the KPI view reports on.

pub mod filter;
pub mod resolver;


pub use filter::DateFilter;
pub use resolver::{Period, resolve_period};
