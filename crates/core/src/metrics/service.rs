//! Metric aggregation over invoices.

use rust_decimal::Decimal;
use tracing::{debug, warn};
use verificador_shared::types::Currency;

use super::rules::{StatusClass, StatusRules};
use super::types::{CurrencyMetrics, MetricBucket};
use crate::invoice::Invoice;
use crate::period::Period;

#[derive(Default)]
struct Totals {
    billed: Decimal,
    won: Decimal,
    available: Decimal,
    count: u64,
}

impl Totals {
    fn add(&mut self, amount: Decimal, class: StatusClass) {
        self.billed = add_amount(self.billed, amount);
        match class {
            StatusClass::Won => self.won = add_amount(self.won, amount),
            StatusClass::Available => self.available = add_amount(self.available, amount),
            StatusClass::Lost => {}
        }
        self.count += 1;
    }

    fn into_bucket(self) -> MetricBucket {
        MetricBucket::from_totals(self.billed, self.won, self.available, self.count)
    }
}

/// Adds `amount` to a running total, saturating at `Decimal::MAX`/`MIN`.
pub(crate) fn add_amount(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        warn!(%total, %amount, "Amount sum overflowed, saturating");
        total.saturating_add(amount)
    })
}

/// Sums invoices per currency without any date filtering.
#[must_use]
pub fn aggregate<'a, I>(records: I, rules: &StatusRules) -> CurrencyMetrics
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut pen = Totals::default();
    let mut usd = Totals::default();

    for invoice in records {
        let totals = match invoice.currency {
            Currency::Pen => &mut pen,
            Currency::Usd => &mut usd,
        };
        totals.add(invoice.amount, rules.classify(&invoice.status));
    }

    CurrencyMetrics {
        pen: pen.into_bucket(),
        usd: usd.into_bucket(),
    }
}

/// Computes the KPI buckets for invoices emitted within `period`.
///
/// Both period bounds are inclusive. An empty (inverted) period matches
/// nothing and yields zero buckets.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use verificador_core::{DateFilter, Invoice, StatusRules, compute_metrics, resolve_period};
/// use verificador_shared::types::Currency;
///
/// let today = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
/// let period = resolve_period(&DateFilter::ThisMonth, today);
/// let invoices = vec![
///     Invoice::new("20100047218", "F001-1", dec!(100), Currency::Pen, today).with_status("Ganada"),
///     Invoice::new("20100047218", "F001-2", dec!(200), Currency::Pen, today),
/// ];
///
/// let metrics = compute_metrics(&invoices, &period, &StatusRules::new("Ganada", Vec::<String>::new()));
/// assert_eq!(metrics.pen.total_billed, dec!(300));
/// assert_eq!(metrics.pen.win_percentage, dec!(33.33));
/// ```
#[must_use]
pub fn compute_metrics(records: &[Invoice], period: &Period, rules: &StatusRules) -> CurrencyMetrics {
    let metrics = aggregate(
        records.iter().filter(|inv| period.contains(inv.emission_date)),
        rules,
    );

    debug!(
        period = %period.label,
        records = records.len(),
        pen_count = metrics.pen.invoice_count,
        usd_count = metrics.usd.invoice_count,
        "Computed dashboard metrics"
    );
    metrics
}
