//! Single state container for one dashboard view.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use verificador_shared::types::InvoiceKey;

use super::error::DashboardError;
use super::types::{ChangeId, DashboardSnapshot, FetchTicket};
use crate::grouping::{Selection, group_invoices};
use crate::invoice::{Invoice, StatusOverrides};
use crate::metrics::{StatusRules, compute_metrics};
use crate::period::{DateFilter, resolve_period};

#[derive(Debug, Clone)]
struct StatusChange {
    key: InvoiceKey,
    status: String,
    committed: bool,
}

/// Owns the filter, the last accepted invoices and local status edits.
///
/// Every filter change starts a new fetch generation. Responses carrying an
/// older ticket are refused so a slow request can never overwrite a newer one.
/// Status edits are applied immediately as overrides and either committed or
/// rolled back once the backend answers. The visible override for an invoice is
/// always the newest change on it that has not been rolled back.
#[derive(Debug, Clone, Default)]
pub struct DashboardStore {
    filter: DateFilter,
    generation: u64,
    invoices: Vec<Invoice>,
    overrides: StatusOverrides,
    changes: BTreeMap<ChangeId, StatusChange>,
    next_change: u64,
    selection: Selection,
}

impl DashboardStore {
    /// Creates an empty store with the given filter.
    #[must_use]
    pub fn new(filter: DateFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Active filter.
    #[must_use]
    pub const fn filter(&self) -> DateFilter {
        self.filter
    }

    /// Ticket of the most recent fetch.
    #[must_use]
    pub const fn current_ticket(&self) -> FetchTicket {
        FetchTicket(self.generation)
    }

    /// Switches the filter and starts a new fetch generation.
    pub fn set_filter(&mut self, filter: DateFilter) -> FetchTicket {
        self.filter = filter;
        self.refresh()
    }

    /// Starts a new fetch generation with the current filter.
    pub fn refresh(&mut self) -> FetchTicket {
        self.generation += 1;
        debug!(generation = self.generation, filter = self.filter.keyword(), "Started fetch");
        self.current_ticket()
    }

    /// Accepts the result of a fetch.
    ///
    /// Committed changes are dropped since the backend now holds them, along
    /// with pending changes older than a committed one on the same invoice.
    /// Newer pending changes stay. Selected keys that vanished are deselected.
    ///
    /// # Errors
    ///
    /// Returns `StaleResponse` if `ticket` is not the latest; the store is left untouched.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        invoices: Vec<Invoice>,
    ) -> Result<(), DashboardError> {
        let current = self.current_ticket();
        if ticket != current {
            warn!(%ticket, %current, "Discarding stale fetch result");
            return Err(DashboardError::StaleResponse { ticket, current });
        }

        self.invoices = invoices;

        let mut last_committed: HashMap<InvoiceKey, ChangeId> = HashMap::new();
        for (id, change) in self.changes.iter().filter(|(_, c)| c.committed) {
            last_committed.insert(change.key.clone(), *id);
        }
        let before = self.changes.len();
        self.changes.retain(|id, change| {
            !change.committed
                && last_committed
                    .get(&change.key)
                    .is_none_or(|committed| id > committed)
        });
        let settled = before - self.changes.len();

        self.overrides.clear();
        for change in self.changes.values() {
            self.overrides.insert(change.key.clone(), change.status.clone());
        }

        let groups = group_invoices(self.invoices());
        self.selection.retain_existing(&groups);

        info!(
            %ticket,
            invoices = self.invoices.len(),
            overrides = self.overrides.len(),
            settled,
            "Applied fetch"
        );
        Ok(())
    }

    /// Accepted invoices with local status overrides applied.
    #[must_use]
    pub fn invoices(&self) -> Vec<Invoice> {
        self.invoices
            .iter()
            .map(|inv| match self.overrides.get(&inv.key()) {
                Some(status) => inv.clone().with_status(status.clone()),
                None => inv.clone(),
            })
            .collect()
    }

    /// Local status overrides currently in effect.
    #[must_use]
    pub const fn overrides(&self) -> &StatusOverrides {
        &self.overrides
    }

    /// Optimistically sets an invoice's status before the backend confirms it.
    pub fn begin_status_change(&mut self, key: InvoiceKey, status: impl Into<String>) -> ChangeId {
        self.next_change += 1;
        let id = ChangeId(self.next_change);
        let status = status.into();
        self.overrides.insert(key.clone(), status.clone());
        debug!(change = %id, key = %key, "Applied optimistic status change");
        self.changes.insert(
            id,
            StatusChange {
                key,
                status,
                committed: false,
            },
        );
        id
    }

    /// Marks a change as confirmed by the backend.
    ///
    /// # Errors
    ///
    /// Returns `UnknownChange` if the change is not pending.
    pub fn commit(&mut self, id: ChangeId) -> Result<(), DashboardError> {
        match self.changes.get_mut(&id) {
            Some(change) if !change.committed => change.committed = true,
            _ => return Err(DashboardError::UnknownChange(id)),
        }
        debug!(change = %id, "Committed status change");
        Ok(())
    }

    /// Reverts a change the backend rejected.
    ///
    /// The invoice falls back to the newest remaining change on it, committed
    /// or pending, or to the backend status when none is left.
    ///
    /// # Errors
    ///
    /// Returns `UnknownChange` if the change is not pending.
    pub fn rollback(&mut self, id: ChangeId) -> Result<(), DashboardError> {
        let change = match self.changes.entry(id) {
            Entry::Occupied(entry) if !entry.get().committed => entry.remove(),
            _ => return Err(DashboardError::UnknownChange(id)),
        };

        let newest = self
            .changes
            .values()
            .rev()
            .find(|c| c.key == change.key)
            .map(|c| c.status.clone());
        match newest {
            Some(status) => {
                self.overrides.insert(change.key.clone(), status);
            }
            None => {
                self.overrides.remove(&change.key);
            }
        }

        warn!(change = %id, key = %change.key, "Rolled back status change");
        Ok(())
    }

    /// Number of changes awaiting confirmation.
    #[must_use]
    pub fn pending_changes(&self) -> usize {
        self.changes.values().filter(|c| !c.committed).count()
    }

    /// Current bulk-edit selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mutable bulk-edit selection.
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Resolves the period and derives KPIs and groups for it.
    #[must_use]
    pub fn snapshot(&self, today: NaiveDate, rules: &StatusRules) -> DashboardSnapshot {
        let period = resolve_period(&self.filter, today);
        let invoices: Vec<Invoice> = self
            .invoices()
            .into_iter()
            .filter(|inv| period.contains(inv.emission_date))
            .collect();
        let metrics = compute_metrics(&invoices, &period, rules);
        DashboardSnapshot {
            filter: self.filter,
            groups: group_invoices(invoices),
            period,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use verificador_shared::types::Currency;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 20).unwrap()
    }

    fn invoice(n: u32, status: &str) -> Invoice {
        Invoice::new("20512345678", format!("F001-{n}"), dec!(100), Currency::Pen, today())
            .with_status(status)
    }

    fn key(n: u32) -> InvoiceKey {
        InvoiceKey::new(format!("20512345678-F001-{n}"))
    }

    fn status_of(store: &DashboardStore, n: u32) -> String {
        store
            .invoices()
            .into_iter()
            .find(|inv| inv.key() == key(n))
            .map(|inv| inv.status)
            .unwrap()
    }

    #[test]
    fn test_stale_response_rejected() {
        let mut store = DashboardStore::new(DateFilter::ThisMonth);
        let first = store.set_filter(DateFilter::LastFiveDays);
        let second = store.set_filter(DateFilter::LastThirtyDays);

        let err = store.apply_fetch(first, vec![invoice(1, "Ganada")]).unwrap_err();
        assert_eq!(err, DashboardError::StaleResponse { ticket: first, current: second });
        assert!(store.invoices().is_empty());

        store.apply_fetch(second, vec![invoice(2, "Ganada")]).unwrap();
        assert_eq!(store.invoices().len(), 1);
        assert_eq!(store.filter(), DateFilter::LastThirtyDays);
    }

    #[test]
    fn test_commit_keeps_override_until_next_fetch() {
        let mut store = DashboardStore::default();
        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Sin gestión")]).unwrap();

        let change = store.begin_status_change(key(1), "Ganada");
        assert_eq!(status_of(&store, 1), "Ganada");
        store.commit(change).unwrap();
        assert_eq!(store.pending_changes(), 0);
        assert_eq!(status_of(&store, 1), "Ganada");

        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Ganada")]).unwrap();
        assert!(store.overrides().is_empty());
        assert_eq!(status_of(&store, 1), "Ganada");
    }

    #[test]
    fn test_rollback_restores_backend_status() {
        let mut store = DashboardStore::default();
        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Gestionando")]).unwrap();

        let change = store.begin_status_change(key(1), "Perdida");
        store.rollback(change).unwrap();
        assert_eq!(status_of(&store, 1), "Gestionando");
        assert_eq!(store.rollback(change), Err(DashboardError::UnknownChange(change)));
    }

    #[test]
    fn test_rollback_of_earlier_change_keeps_later_value() {
        let mut store = DashboardStore::default();
        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Sin gestión")]).unwrap();

        let first = store.begin_status_change(key(1), "Gestionando");
        let second = store.begin_status_change(key(1), "Ganada");

        store.rollback(first).unwrap();
        assert_eq!(status_of(&store, 1), "Ganada");

        store.rollback(second).unwrap();
        assert_eq!(status_of(&store, 1), "Sin gestión");
        assert!(store.overrides().is_empty());
    }

    #[test]
    fn test_rollback_after_later_commit_keeps_committed_value() {
        let mut store = DashboardStore::default();
        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Sin gestión")]).unwrap();

        let first = store.begin_status_change(key(1), "Gestionando");
        let second = store.begin_status_change(key(1), "Ganada");
        store.commit(second).unwrap();
        store.rollback(first).unwrap();

        assert_eq!(status_of(&store, 1), "Ganada");
        assert_eq!(store.pending_changes(), 0);
        assert_eq!(store.rollback(second), Err(DashboardError::UnknownChange(second)));
        assert_eq!(store.commit(second), Err(DashboardError::UnknownChange(second)));
    }

    #[test]
    fn test_rollback_of_later_change_falls_back_to_committed_value() {
        let mut store = DashboardStore::default();
        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Sin gestión")]).unwrap();

        let first = store.begin_status_change(key(1), "Gestionando");
        store.commit(first).unwrap();
        let second = store.begin_status_change(key(1), "Perdida");
        store.rollback(second).unwrap();

        assert_eq!(status_of(&store, 1), "Gestionando");
    }

    #[test]
    fn test_committed_override_dropped_when_backend_disagrees() {
        let mut store = DashboardStore::default();
        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Sin gestión")]).unwrap();

        let change = store.begin_status_change(key(1), "Ganada");
        store.commit(change).unwrap();

        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Perdida")]).unwrap();
        assert!(store.overrides().is_empty());
        assert_eq!(status_of(&store, 1), "Perdida");
    }

    #[test]
    fn test_refetch_drops_pending_change_older_than_commit() {
        let mut store = DashboardStore::default();
        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Sin gestión")]).unwrap();

        let first = store.begin_status_change(key(1), "Gestionando");
        let second = store.begin_status_change(key(1), "Ganada");
        let third = store.begin_status_change(key(1), "Perdida");
        store.commit(second).unwrap();

        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Ganada")]).unwrap();
        assert_eq!(store.pending_changes(), 1);
        assert_eq!(status_of(&store, 1), "Perdida");
        assert_eq!(store.rollback(first), Err(DashboardError::UnknownChange(first)));

        store.rollback(third).unwrap();
        assert_eq!(status_of(&store, 1), "Ganada");
        assert!(store.overrides().is_empty());
    }

    #[test]
    fn test_pending_override_survives_refetch() {
        let mut store = DashboardStore::default();
        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Sin gestión")]).unwrap();
        store.begin_status_change(key(1), "Ganada");

        let ticket = store.refresh();
        store.apply_fetch(ticket, vec![invoice(1, "Ganada")]).unwrap();
        assert_eq!(store.overrides().len(), 1);
    }

    #[test]
    fn test_snapshot_uses_overrides() {
        let mut store = DashboardStore::new(DateFilter::ThisMonth);
        let ticket = store.refresh();
        store
            .apply_fetch(ticket, vec![invoice(1, "Sin gestión"), invoice(2, "Sin gestión")])
            .unwrap();
        store.begin_status_change(key(1), "Ganada");

        let snapshot = store.snapshot(today(), &StatusRules::sunat());
        assert_eq!(snapshot.period.label, "Octubre 2025");
        assert_eq!(snapshot.metrics.pen.total_won, dec!(100));
        assert_eq!(snapshot.metrics.pen.win_percentage, dec!(50));
        assert_eq!(snapshot.groups.len(), 1);
    }
}
