//! Invoice adapter error types.

use thiserror::Error;

/// Errors raised while normalizing backend rows into invoices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvoiceError {
    /// A field the canonical record cannot do without is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Currency code outside `{PEN, USD}`.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Emission date that is not a calendar date.
    #[error("Invalid emission date: {0}")]
    InvalidDate(String),

    /// Payload is neither a list of rows nor an object wrapping one.
    #[error("Unexpected payload shape: {0}")]
    UnexpectedPayload(String),
}
