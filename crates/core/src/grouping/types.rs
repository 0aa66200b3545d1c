//! Grouping types.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use verificador_shared::types::{ClientId, Currency};

use crate::invoice::Invoice;
use crate::metrics::service::add_amount;

/// Identity of a group: same client, same debtor, same currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    /// Selling client.
    pub client_id: ClientId,
    /// Paying counterparty.
    pub debtor: String,
    /// Invoice currency.
    pub currency: Currency,
}

impl GroupKey {
    /// Key of the group an invoice belongs to.
    #[must_use]
    pub fn of(invoice: &Invoice) -> Self {
        Self {
            client_id: invoice.client_id.clone(),
            debtor: invoice.debtor.clone(),
            currency: invoice.currency,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.client_id, self.debtor, self.currency)
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Invoices sharing a group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceGroup {
    /// Group identity.
    pub key: GroupKey,
    /// Client name copied from the first member.
    pub client_name: String,
    /// Debtor copied from the first member.
    pub debtor: String,
    /// Currency shared by every member.
    pub currency: Currency,
    /// Number of members.
    pub invoice_count: usize,
    /// Sum of member amounts.
    pub total_amount: Decimal,
    /// Members in input order.
    pub invoices: Vec<Invoice>,
}

impl InvoiceGroup {
    pub(crate) fn start(key: GroupKey, first: &Invoice) -> Self {
        Self {
            key,
            client_name: first.client_name.clone(),
            debtor: first.debtor.clone(),
            currency: first.currency,
            invoice_count: 0,
            total_amount: Decimal::ZERO,
            invoices: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, invoice: Invoice) {
        self.invoice_count += 1;
        self.total_amount = add_amount(self.total_amount, invoice.amount);
        self.invoices.push(invoice);
    }

    /// Members that can be selected for bulk edits.
    pub fn selectable(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.iter().filter(|inv| inv.is_selectable())
    }
}

/// Groups in first-seen order with key lookup.
#[derive(Debug, Clone, Default)]
pub struct GroupedInvoices {
    groups: Vec<InvoiceGroup>,
    index: HashMap<GroupKey, usize>,
}

impl GroupedInvoices {
    /// Empty grouping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, invoice: Invoice) {
        let key = GroupKey::of(&invoice);
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.groups.push(InvoiceGroup::start(key.clone(), &invoice));
                self.index.insert(key, slot);
                slot
            }
        };
        self.groups[slot].push(invoice);
    }

    /// Group for a key.
    #[must_use]
    pub fn get(&self, key: &GroupKey) -> Option<&InvoiceGroup> {
        self.index.get(key).map(|&slot| &self.groups[slot])
    }

    /// Groups in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, InvoiceGroup> {
        self.groups.iter()
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of invoices across all groups.
    #[must_use]
    pub fn invoice_count(&self) -> usize {
        self.groups.iter().map(|g| g.invoice_count).sum()
    }

    /// Members of every group, group by group.
    #[must_use]
    pub fn flatten(&self) -> Vec<Invoice> {
        self.groups
            .iter()
            .flat_map(|g| g.invoices.iter().cloned())
            .collect()
    }

    /// Consumes the grouping, returning the ordered groups.
    #[must_use]
    pub fn into_groups(self) -> Vec<InvoiceGroup> {
        self.groups
    }
}

impl PartialEq for GroupedInvoices {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl Eq for GroupedInvoices {}

impl Serialize for GroupedInvoices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.groups.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a GroupedInvoices {
    type Item = &'a InvoiceGroup;
    type IntoIter = std::slice::Iter<'a, InvoiceGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
