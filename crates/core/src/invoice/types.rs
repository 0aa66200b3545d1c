//! Canonical invoice record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use verificador_shared::types::{ClientId, Currency, InvoiceId, InvoiceKey, Money};

/// Status label that marks an invoice as won.
pub const STATUS_WON: &str = "Ganada";

/// Status label for invoices nobody has worked on yet.
pub const STATUS_UNMANAGED: &str = "Sin gestión";

/// A factoring receivable as the KPI engine sees it.
///
/// The status is an opaque label; only the won label and the configured lost
/// set carry meaning, and that interpretation lives in `StatusRules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Series and number, unique within the client.
    pub id: InvoiceId,
    /// RUC of the selling client.
    pub client_id: ClientId,
    /// Display name of the selling client.
    pub client_name: String,
    /// Name of the paying counterparty.
    pub debtor: String,
    /// Net amount in `currency` units. Zero means fully credited.
    pub amount: Decimal,
    /// Invoice currency.
    pub currency: Currency,
    /// Emission date.
    pub emission_date: NaiveDate,
    /// Workflow status label.
    pub status: String,
    /// Loss reason when the invoice was marked lost.
    #[serde(default)]
    pub loss_reason: Option<String>,
    /// Staff member the invoice is assigned to.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Amount before credit notes, when it differs from `amount`.
    #[serde(default)]
    pub gross_amount: Option<Decimal>,
    /// Sum of credit notes applied.
    #[serde(default)]
    pub credit_note_amount: Option<Decimal>,
    /// Whether any credit note references this invoice.
    #[serde(default)]
    pub has_credit_note: bool,
    /// Backend row id used when pushing status updates.
    #[serde(default)]
    pub record_id: Option<i64>,
}

impl Invoice {
    /// Creates an unmanaged invoice with the client RUC doubling as its name.
    #[must_use]
    pub fn new(
        client_id: impl Into<ClientId>,
        id: impl Into<InvoiceId>,
        amount: Decimal,
        currency: Currency,
        emission_date: NaiveDate,
    ) -> Self {
        let client_id = client_id.into();
        Self {
            id: id.into(),
            client_name: client_id.to_string(),
            client_id,
            debtor: "Sin nombre".to_string(),
            amount,
            currency,
            emission_date,
            status: STATUS_UNMANAGED.to_string(),
            loss_reason: None,
            assignee: None,
            gross_amount: None,
            credit_note_amount: None,
            has_credit_note: false,
            record_id: None,
        }
    }

    /// Sets the status label.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the debtor name.
    #[must_use]
    pub fn with_debtor(mut self, debtor: impl Into<String>) -> Self {
        self.debtor = debtor.into();
        self
    }

    /// Sets the client display name.
    #[must_use]
    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// Composite selection key `{client_id}-{id}`.
    #[must_use]
    pub fn key(&self) -> InvoiceKey {
        InvoiceKey::compose(&self.client_id, &self.id)
    }

    /// Amount paired with its currency.
    #[must_use]
    pub fn money(&self) -> Money {
        Money::new(self.amount, self.currency)
    }

    /// Fully credited invoices cannot be selected for bulk edits.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.amount.is_zero()
    }
}
