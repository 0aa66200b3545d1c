//! Bulk-edit selection over grouped invoices.

use std::collections::BTreeSet;

use verificador_shared::types::InvoiceKey;

use super::types::{GroupedInvoices, InvoiceGroup};
use crate::invoice::Invoice;

/// Tri-state checkbox for a group header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Every selectable member is selected.
    Checked,
    /// Some but not all selectable members are selected.
    Indeterminate,
    /// No selectable member is selected, or there are none.
    Unchecked,
}

/// Set of selected invoice keys.
///
/// Fully credited (zero amount) invoices never enter the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: BTreeSet<InvoiceKey>,
}

impl Selection {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips one invoice. Returns whether it is selected afterwards.
    pub fn toggle_invoice(&mut self, invoice: &Invoice) -> bool {
        if !invoice.is_selectable() {
            return false;
        }
        let key = invoice.key();
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Selects every selectable member, or deselects them all if they already are.
    pub fn toggle_group(&mut self, group: &InvoiceGroup) {
        if self.group_state(group) == CheckState::Checked {
            for invoice in group.selectable() {
                self.keys.remove(&invoice.key());
            }
        } else {
            self.keys.extend(group.selectable().map(Invoice::key));
        }
    }

    /// Checkbox state of a group header.
    #[must_use]
    pub fn group_state(&self, group: &InvoiceGroup) -> CheckState {
        let (total, selected) = group.selectable().fold((0usize, 0usize), |(t, s), inv| {
            (t + 1, s + usize::from(self.keys.contains(&inv.key())))
        });
        match (total, selected) {
            (0, _) | (_, 0) => CheckState::Unchecked,
            (t, s) if t == s => CheckState::Checked,
            _ => CheckState::Indeterminate,
        }
    }

    /// True if the invoice is selected.
    #[must_use]
    pub fn contains(&self, key: &InvoiceKey) -> bool {
        self.keys.contains(key)
    }

    /// Selected keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &InvoiceKey> {
        self.keys.iter()
    }

    /// Number of selected invoices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Drops keys that are no longer present or selectable after a refetch.
    pub fn retain_existing(&mut self, groups: &GroupedInvoices) {
        let live: BTreeSet<InvoiceKey> = groups
            .iter()
            .flat_map(InvoiceGroup::selectable)
            .map(Invoice::key)
            .collect();
        self.keys.retain(|key| live.contains(key));
    }
}
