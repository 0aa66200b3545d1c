//! Dashboard store errors.

use thiserror::Error;

use super::types::{ChangeId, FetchTicket};

/// Errors raised by [`DashboardStore`](super::DashboardStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// A fetch result arrived after a newer fetch was started.
    #[error("Stale response for fetch {ticket}, current fetch is {current}")]
    StaleResponse {
        /// Ticket the response was issued for.
        ticket: FetchTicket,
        /// Ticket of the most recent fetch.
        current: FetchTicket,
    },

    /// The change was already committed, rolled back, or never existed.
    #[error("Unknown status change: {0}")]
    UnknownChange(ChangeId),
}
