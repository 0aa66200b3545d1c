//! Dashboard store handles and snapshot.

use std::fmt;

use serde::Serialize;

use crate::grouping::GroupedInvoices;
use crate::metrics::CurrencyMetrics;
use crate::period::{DateFilter, Period};

/// Generation number of a fetch. Only the latest one may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FetchTicket(pub(crate) u64);

impl FetchTicket {
    /// Raw generation number.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FetchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for an optimistic status change awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChangeId(pub(crate) u64);

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the KPI view renders, derived from the store in one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Active filter.
    pub filter: DateFilter,
    /// Period the filter resolved to.
    pub period: Period,
    /// Per-currency KPIs for the period.
    pub metrics: CurrencyMetrics,
    /// Invoices of the period grouped for the list view.
    pub groups: GroupedInvoices,
}
