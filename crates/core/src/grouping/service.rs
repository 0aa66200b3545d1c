//! Grouping engine.

use tracing::debug;

use super::types::GroupedInvoices;
use crate::invoice::Invoice;

/// Groups invoices by `(client_id, debtor, currency)` in a single pass.
///
/// First-seen key order is preserved and members keep input order. Zero
/// amounts are grouped like any other invoice.
#[must_use]
pub fn group_invoices<I>(records: I) -> GroupedInvoices
where
    I: IntoIterator<Item = Invoice>,
{
    let mut grouped = GroupedInvoices::new();
    for invoice in records {
        grouped.insert(invoice);
    }

    debug!(
        groups = grouped.len(),
        invoices = grouped.invoice_count(),
        "Grouped invoices"
    );
    grouped
}
