//! KPI bucket types.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use verificador_shared::types::Currency;

/// Totals for a single currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBucket {
    /// Sum of all invoice amounts in the period.
    pub total_billed: Decimal,
    /// Sum of amounts whose status is the won label.
    pub total_won: Decimal,
    /// Sum of amounts that are neither won nor lost.
    pub total_available: Decimal,
    /// `total_won / total_billed * 100`, rounded to 2 places; 0 when nothing was billed.
    pub win_percentage: Decimal,
    /// Number of invoices counted.
    pub invoice_count: u64,
}

impl MetricBucket {
    /// Builds a bucket from raw totals, deriving the win percentage.
    #[must_use]
    pub fn from_totals(
        total_billed: Decimal,
        total_won: Decimal,
        total_available: Decimal,
        invoice_count: u64,
    ) -> Self {
        Self {
            total_billed,
            total_won,
            total_available,
            win_percentage: win_percentage(total_won, total_billed),
            invoice_count,
        }
    }

    /// Win percentage as `f64` for chart and gauge rendering.
    #[must_use]
    pub fn win_percentage_f64(&self) -> f64 {
        self.win_percentage.to_f64().unwrap_or_default()
    }
}

/// `won / billed * 100` rounded half away from zero to 2 places.
///
/// Returns zero unless `billed` is strictly positive.
#[must_use]
pub fn win_percentage(won: Decimal, billed: Decimal) -> Decimal {
    if billed <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    won.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(billed))
        .or_else(|| {
            won.checked_div(billed)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .map(|pct| pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or_default()
}

/// One bucket per supported currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyMetrics {
    /// Peruvian sol totals.
    #[serde(rename = "PEN")]
    pub pen: MetricBucket,
    /// US dollar totals.
    #[serde(rename = "USD")]
    pub usd: MetricBucket,
}

impl CurrencyMetrics {
    /// Bucket for a currency.
    #[must_use]
    pub const fn get(&self, currency: Currency) -> &MetricBucket {
        match currency {
            Currency::Pen => &self.pen,
            Currency::Usd => &self.usd,
        }
    }

    /// Mutable bucket for a currency.
    pub fn get_mut(&mut self, currency: Currency) -> &mut MetricBucket {
        match currency {
            Currency::Pen => &mut self.pen,
            Currency::Usd => &mut self.usd,
        }
    }

    /// Buckets paired with their currency, PEN first.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, &MetricBucket)> {
        Currency::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}
