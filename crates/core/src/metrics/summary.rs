//! Normalization of precomputed backend summaries.
//!
//! The metrics endpoint answers in one of two shapes depending on whether the
//! materialized view is available. Both map onto `CurrencyMetrics`; anything
//! else becomes zero buckets.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use super::types::{CurrencyMetrics, MetricBucket};
use crate::invoice::adapter::coerce_amount;

impl CurrencyMetrics {
    /// Normalizes a backend summary payload.
    ///
    /// Accepted shapes:
    /// - `{"PEN": {totalFacturado, montoGanado, montoDisponible, cantidad}, "USD": {..}}`
    /// - legacy `{total_pen, total_usd, facturas_pen, facturas_usd}`, where the
    ///   whole total counts as available and nothing as won
    ///
    /// Win percentage is always recomputed from the totals.
    #[must_use]
    pub fn from_summary(payload: &Value) -> Self {
        metrics_from_summary(payload)
    }
}

/// Free-function form of [`CurrencyMetrics::from_summary`].
#[must_use]
pub fn metrics_from_summary(payload: &Value) -> CurrencyMetrics {
    if let (Some(pen @ Value::Object(_)), Some(usd @ Value::Object(_))) =
        (payload.get("PEN"), payload.get("USD"))
    {
        return CurrencyMetrics {
            pen: bucket_from_current(pen),
            usd: bucket_from_current(usd),
        };
    }

    if payload.get("total_pen").is_some() {
        return CurrencyMetrics {
            pen: bucket_from_legacy(payload, "total_pen", "facturas_pen"),
            usd: bucket_from_legacy(payload, "total_usd", "facturas_usd"),
        };
    }

    if !payload.is_null() {
        warn!("Unrecognized metrics summary shape, using zero buckets");
    }
    CurrencyMetrics::default()
}

fn bucket_from_current(value: &Value) -> MetricBucket {
    MetricBucket::from_totals(
        amount_at(value, "totalFacturado"),
        amount_at(value, "montoGanado"),
        amount_at(value, "montoDisponible"),
        count_at(value, "cantidad"),
    )
}

fn bucket_from_legacy(payload: &Value, total_key: &str, count_key: &str) -> MetricBucket {
    let total = amount_at(payload, total_key);
    MetricBucket::from_totals(total, Decimal::ZERO, total, count_at(payload, count_key))
}

fn amount_at(value: &Value, key: &str) -> Decimal {
    value.get(key).map(coerce_amount).unwrap_or_default()
}

fn count_at(value: &Value, key: &str) -> u64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}
