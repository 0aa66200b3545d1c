//! Normalizes SUNAT backend sales rows into canonical invoices.
//!
//! Backend numbers arrive as JSON numbers or numeric strings depending on the
//! endpoint. Every amount is coerced through `coerce_amount`, so a malformed
//! value contributes zero instead of poisoning a sum.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use verificador_shared::types::money::{decimal_from_f64, decimal_from_str_lossy};
use verificador_shared::types::{ClientId, Currency, InvoiceId, InvoiceKey};

use super::error::InvoiceError;
use super::types::{Invoice, STATUS_UNMANAGED};

/// Locally edited statuses keyed by invoice key; they win over the backend's `estado1`.
pub type StatusOverrides = HashMap<InvoiceKey, String>;

/// One row of the `/api/ventas` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VentaRecord {
    /// Backend row id.
    pub id: Option<Value>,
    /// Client RUC.
    pub ruc: Option<String>,
    /// Client legal name.
    pub razon_social: Option<String>,
    /// Debtor legal name.
    pub apellidos_nombres_razon_social: Option<String>,
    /// Document series, e.g. `F001`.
    pub serie_cdp: Option<Value>,
    /// Document number.
    pub nro_cp_inicial: Option<Value>,
    /// Emission date, `YYYY-MM-DD` with an optional time suffix.
    pub fecha_emision: Option<String>,
    /// Currency code.
    pub moneda: Option<String>,
    /// Amount in original currency.
    pub monto_original: Option<Value>,
    /// Amount in PEN.
    pub total_cp: Option<Value>,
    /// Exchange rate applied to `total_cp`.
    pub tipo_cambio: Option<Value>,
    /// Amount net of credit notes.
    pub monto_neto: Option<Value>,
    /// Credit note total.
    pub nota_credito_monto: Option<Value>,
    /// Credit note flag.
    pub tiene_nota_credito: Option<bool>,
    /// Workflow status.
    pub estado1: Option<String>,
    /// Loss reason.
    pub estado2: Option<String>,
    /// Assigned staff member.
    pub usuario_nombre: Option<String>,
}

/// Extracts the row list from a backend payload.
///
/// Accepts a bare array or an object wrapping it under `items` or `data`.
pub fn records_from_payload(payload: &Value) -> Result<Vec<VentaRecord>, InvoiceError> {
    let rows = match payload {
        Value::Array(_) => payload,
        Value::Object(map) => map
            .get("items")
            .or_else(|| map.get("data"))
            .filter(|rows| rows.is_array())
            .ok_or_else(|| {
                InvoiceError::UnexpectedPayload("object without items/data array".to_string())
            })?,
        other => {
            return Err(InvoiceError::UnexpectedPayload(format!(
                "expected array or object, got {}",
                json_kind(other)
            )));
        }
    };

    serde_json::from_value(rows.clone())
        .map_err(|e| InvoiceError::UnexpectedPayload(e.to_string()))
}

/// Normalizes one backend row.
pub fn normalize(record: &VentaRecord, overrides: &StatusOverrides) -> Result<Invoice, InvoiceError> {
    let ruc = non_empty(record.ruc.as_deref()).ok_or(InvoiceError::MissingField("ruc"))?;
    let client_id = ClientId::new(ruc);

    let series = record.serie_cdp.as_ref().map(text_of).unwrap_or_default();
    let number = record
        .nro_cp_inicial
        .as_ref()
        .map(text_of)
        .filter(|n| !n.is_empty())
        .or_else(|| record.id.as_ref().map(text_of))
        .unwrap_or_default();
    let id = InvoiceId::new(format!("{series}-{number}"));

    let currency_code =
        non_empty(record.moneda.as_deref()).ok_or(InvoiceError::MissingField("moneda"))?;
    let currency: Currency = currency_code
        .parse()
        .map_err(|_| InvoiceError::UnknownCurrency(currency_code.to_string()))?;

    let raw_date =
        non_empty(record.fecha_emision.as_deref()).ok_or(InvoiceError::MissingField("fecha_emision"))?;
    let emission_date = parse_emission_date(raw_date)?;

    let gross = non_negative(gross_amount(record), "gross", &id);
    let amount = record
        .monto_neto
        .as_ref()
        .map_or(gross, |net| non_negative(coerce_amount(net), "monto_neto", &id));

    let key = InvoiceKey::compose(&client_id, &id);
    let status = overrides
        .get(&key)
        .cloned()
        .or_else(|| non_empty(record.estado1.as_deref()).map(str::to_string))
        .unwrap_or_else(|| STATUS_UNMANAGED.to_string());

    Ok(Invoice {
        client_name: non_empty(record.razon_social.as_deref())
            .unwrap_or(ruc)
            .to_string(),
        debtor: non_empty(record.apellidos_nombres_razon_social.as_deref())
            .unwrap_or("Sin nombre")
            .to_string(),
        id,
        client_id,
        amount,
        currency,
        emission_date,
        status,
        loss_reason: non_empty(record.estado2.as_deref()).map(str::to_string),
        assignee: Some(
            non_empty(record.usuario_nombre.as_deref())
                .unwrap_or("Sin asignar")
                .to_string(),
        ),
        gross_amount: (gross != amount).then_some(gross),
        credit_note_amount: record.nota_credito_monto.as_ref().map(coerce_amount),
        has_credit_note: record.tiene_nota_credito.unwrap_or(false),
        record_id: record.id.as_ref().and_then(Value::as_i64),
    })
}

/// Normalizes a batch, skipping rows that cannot be normalized.
pub fn normalize_all(records: &[VentaRecord], overrides: &StatusOverrides) -> Vec<Invoice> {
    let invoices: Vec<Invoice> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match normalize(record, overrides) {
            Ok(invoice) => Some(invoice),
            Err(e) => {
                warn!(row = index, error = %e, "Skipping backend row");
                None
            }
        })
        .collect();

    debug!(
        rows = records.len(),
        invoices = invoices.len(),
        "Normalized backend rows"
    );
    invoices
}

/// Original-currency amount before credit notes.
///
/// Precedence: `monto_original`, then `total_cp / tipo_cambio` when the rate is
/// positive, then `total_cp` as is.
fn gross_amount(record: &VentaRecord) -> Decimal {
    if let Some(original) = &record.monto_original {
        return coerce_amount(original);
    }

    let total = record.total_cp.as_ref().map(coerce_amount).unwrap_or_default();
    let rate = record.tipo_cambio.as_ref().map(coerce_amount).unwrap_or_default();
    if !total.is_zero() && rate > Decimal::ZERO {
        return total
            .checked_div(rate)
            .map(|v| v.round_dp_with_strategy(4, RoundingStrategy::MidpointNearestEven))
            .unwrap_or(total);
    }
    total
}

/// Clamps a negative amount to zero; a credit larger than the invoice leaves nothing to factor.
fn non_negative(amount: Decimal, field: &'static str, id: &InvoiceId) -> Decimal {
    if amount.is_sign_negative() && !amount.is_zero() {
        warn!(field, invoice = %id, %amount, "Negative amount clamped to zero");
        return Decimal::ZERO;
    }
    amount
}

/// Coerces a JSON number or numeric string into a `Decimal`; anything else is zero.
#[must_use]
pub fn coerce_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| Decimal::from_scientific(&n.to_string()).ok())
            .unwrap_or_else(|| n.as_f64().map(decimal_from_f64).unwrap_or_default()),
        Value::String(s) => decimal_from_str_lossy(s),
        _ => Decimal::ZERO,
    }
}

fn parse_emission_date(raw: &str) -> Result<NaiveDate, InvoiceError> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map_err(|_| InvoiceError::InvalidDate(raw.to_string()))
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn row(value: Value) -> VentaRecord {
        serde_json::from_value(value).unwrap()
    }

    fn base_row() -> Value {
        json!({
            "id": 981,
            "ruc": "20512345678",
            "razon_social": "Textiles Andinos SAC",
            "apellidos_nombres_razon_social": "RIPLEY PERU S.A.",
            "serie_cdp": "F001",
            "nro_cp_inicial": "1234",
            "fecha_emision": "2025-10-20",
            "moneda": "PEN",
            "monto_original": "45000.00",
            "estado1": "Gestionando",
            "usuario_nombre": "Ana Torres"
        })
    }

    #[test]
    fn test_normalize_full_row() {
        let invoice = normalize(&row(base_row()), &StatusOverrides::new()).unwrap();
        assert_eq!(invoice.id.as_str(), "F001-1234");
        assert_eq!(invoice.key().as_str(), "20512345678-F001-1234");
        assert_eq!(invoice.client_name, "Textiles Andinos SAC");
        assert_eq!(invoice.debtor, "RIPLEY PERU S.A.");
        assert_eq!(invoice.amount, dec!(45000));
        assert_eq!(invoice.currency, Currency::Pen);
        assert_eq!(invoice.emission_date, NaiveDate::from_ymd_opt(2025, 10, 20).unwrap());
        assert_eq!(invoice.status, "Gestionando");
        assert_eq!(invoice.assignee.as_deref(), Some("Ana Torres"));
        assert_eq!(invoice.record_id, Some(981));
        assert_eq!(invoice.gross_amount, None);
    }

    #[test]
    fn test_fallbacks() {
        let invoice = normalize(
            &row(json!({
                "id": 77,
                "ruc": "20512345678",
                "fecha_emision": "2025-10-20T00:00:00",
                "moneda": "usd",
                "total_cp": 3750
            })),
            &StatusOverrides::new(),
        )
        .unwrap();
        assert_eq!(invoice.id.as_str(), "-77");
        assert_eq!(invoice.client_name, "20512345678");
        assert_eq!(invoice.debtor, "Sin nombre");
        assert_eq!(invoice.status, STATUS_UNMANAGED);
        assert_eq!(invoice.assignee.as_deref(), Some("Sin asignar"));
        assert_eq!(invoice.currency, Currency::Usd);
        assert_eq!(invoice.amount, dec!(3750));
    }

    #[test]
    fn test_amount_from_exchange_rate() {
        let mut value = base_row();
        value["monto_original"] = Value::Null;
        value["total_cp"] = json!("3750.00");
        value["tipo_cambio"] = json!(3.75);
        let invoice = normalize(&row(value), &StatusOverrides::new()).unwrap();
        assert_eq!(invoice.amount, dec!(1000));
    }

    #[test]
    fn test_net_amount_wins_over_gross() {
        let mut value = base_row();
        value["monto_neto"] = json!(0);
        value["nota_credito_monto"] = json!("45000");
        value["tiene_nota_credito"] = json!(true);
        let invoice = normalize(&row(value), &StatusOverrides::new()).unwrap();
        assert_eq!(invoice.amount, Decimal::ZERO);
        assert_eq!(invoice.gross_amount, Some(dec!(45000)));
        assert_eq!(invoice.credit_note_amount, Some(dec!(45000)));
        assert!(invoice.has_credit_note);
        assert!(!invoice.is_selectable());
    }

    #[test]
    fn test_malformed_amount_coerces_to_zero() {
        let mut value = base_row();
        value["monto_original"] = json!("N/A");
        let invoice = normalize(&row(value), &StatusOverrides::new()).unwrap();
        assert_eq!(invoice.amount, Decimal::ZERO);
    }

    #[test]
    fn test_negative_amounts_clamp_to_zero() {
        let mut value = base_row();
        value["monto_neto"] = json!("-50");
        let invoice = normalize(&row(value), &StatusOverrides::new()).unwrap();
        assert_eq!(invoice.amount, Decimal::ZERO);
        assert_eq!(invoice.gross_amount, Some(dec!(45000)));

        let mut value = base_row();
        value["monto_original"] = json!(-120.5);
        let invoice = normalize(&row(value), &StatusOverrides::new()).unwrap();
        assert_eq!(invoice.amount, Decimal::ZERO);
        assert_eq!(invoice.gross_amount, None);
        assert!(!invoice.is_selectable());
    }

    #[test]
    fn test_override_wins_over_backend_status() {
        let mut overrides = StatusOverrides::new();
        overrides.insert(InvoiceKey::new("20512345678-F001-1234"), "Ganada".to_string());
        let invoice = normalize(&row(base_row()), &overrides).unwrap();
        assert_eq!(invoice.status, "Ganada");
    }

    #[test]
    fn test_rejections() {
        let mut value = base_row();
        value["moneda"] = json!("EUR");
        assert_eq!(
            normalize(&row(value), &StatusOverrides::new()),
            Err(InvoiceError::UnknownCurrency("EUR".to_string()))
        );

        let mut value = base_row();
        value["fecha_emision"] = json!("20/13/2025");
        assert!(matches!(
            normalize(&row(value), &StatusOverrides::new()),
            Err(InvoiceError::InvalidDate(_))
        ));

        let mut value = base_row();
        value["ruc"] = Value::Null;
        assert_eq!(
            normalize(&row(value), &StatusOverrides::new()),
            Err(InvoiceError::MissingField("ruc"))
        );
    }

    #[test]
    fn test_normalize_all_skips_bad_rows() {
        let mut bad = base_row();
        bad["moneda"] = json!("BRL");
        let rows = vec![row(base_row()), row(bad)];
        let invoices = normalize_all(&rows, &StatusOverrides::new());
        assert_eq!(invoices.len(), 1);
    }

    #[test]
    fn test_records_from_payload_shapes() {
        let rows = json!([base_row()]);
        assert_eq!(records_from_payload(&rows).unwrap().len(), 1);
        assert_eq!(
            records_from_payload(&json!({"items": [base_row(), base_row()]})).unwrap().len(),
            2
        );
        assert_eq!(records_from_payload(&json!({"data": []})).unwrap().len(), 0);
        assert!(records_from_payload(&json!({"rows": []})).is_err());
        assert!(records_from_payload(&json!("nope")).is_err());
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount(&json!(100.25)), dec!(100.25));
        assert_eq!(coerce_amount(&json!("200")), dec!(200));
        assert_eq!(coerce_amount(&json!(true)), Decimal::ZERO);
        assert_eq!(coerce_amount(&Value::Null), Decimal::ZERO);
    }
}
