//! Integration tests for the full dashboard flow.
//!
//! Backend payload in, KPIs and groups out, with the store sitting in between.

use chrono::NaiveDate;
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use verificador_core::dashboard::{DashboardError, DashboardStore};
use verificador_core::grouping::{CheckState, Selection};
use verificador_core::invoice::{StatusOverrides, normalize_all, records_from_payload};
use verificador_core::{DateFilter, StatusRules, compute_metrics, group_invoices, resolve_period};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 20).unwrap()
}

#[fixture]
fn payload() -> Value {
    json!({
        "items": [
            {
                "id": 1, "ruc": "20512345678", "razon_social": "Textiles Andinos SAC",
                "apellidos_nombres_razon_social": "RIPLEY PERU S.A.",
                "serie_cdp": "F001", "nro_cp_inicial": "101",
                "fecha_emision": "2025-10-02", "moneda": "PEN",
                "monto_original": "100.00", "estado1": "Ganada"
            },
            {
                "id": 2, "ruc": "20512345678", "razon_social": "Textiles Andinos SAC",
                "apellidos_nombres_razon_social": "RIPLEY PERU S.A.",
                "serie_cdp": "F001", "nro_cp_inicial": "102",
                "fecha_emision": "2025-10-15T10:30:00", "moneda": "PEN",
                "monto_original": 200
            },
            {
                "id": 3, "ruc": "20100047218", "razon_social": "Agro Norte EIRL",
                "apellidos_nombres_razon_social": "SAGA FALABELLA S.A.",
                "serie_cdp": "E001", "nro_cp_inicial": "7",
                "fecha_emision": "2025-10-18", "moneda": "USD",
                "monto_original": 50, "estado1": "Ganada"
            },
            {
                "id": 4, "ruc": "20100047218", "razon_social": "Agro Norte EIRL",
                "apellidos_nombres_razon_social": "SAGA FALABELLA S.A.",
                "serie_cdp": "E001", "nro_cp_inicial": "8",
                "fecha_emision": "2025-10-19", "moneda": "USD",
                "monto_original": 80, "monto_neto": 0, "tiene_nota_credito": true
            },
            {
                "id": 5, "ruc": "20100047218", "serie_cdp": "E001", "nro_cp_inicial": "9",
                "fecha_emision": "2025-10-19", "moneda": "EUR", "monto_original": 10
            },
            {
                "id": 6, "ruc": "20512345678", "razon_social": "Textiles Andinos SAC",
                "apellidos_nombres_razon_social": "RIPLEY PERU S.A.",
                "serie_cdp": "F001", "nro_cp_inicial": "90",
                "fecha_emision": "2025-09-28", "moneda": "PEN",
                "monto_original": 999, "estado1": "Perdida"
            }
        ]
    })
}

// ============================================================================
// Test: Payload to KPIs
// ============================================================================
#[rstest]
fn test_payload_to_metrics(payload: Value) {
    let rows = records_from_payload(&payload).unwrap();
    let invoices = normalize_all(&rows, &StatusOverrides::new());
    assert_eq!(invoices.len(), 5, "EUR row should be skipped");

    let period = resolve_period(&DateFilter::ThisMonth, today());
    let metrics = compute_metrics(&invoices, &period, &StatusRules::sunat());

    assert_eq!(metrics.pen.total_billed, dec!(300));
    assert_eq!(metrics.pen.total_won, dec!(100));
    assert_eq!(metrics.pen.total_available, dec!(200));
    assert_eq!(metrics.pen.win_percentage, dec!(33.33));

    assert_eq!(metrics.usd.total_billed, dec!(50));
    assert_eq!(metrics.usd.win_percentage, dec!(100));
    assert_eq!(metrics.usd.invoice_count, 2);
}

// ============================================================================
// Test: Rolling window picks up the previous month
// ============================================================================
#[rstest]
#[case(DateFilter::LastFiveDays, dec!(200))]
#[case(DateFilter::LastThirtyDays, dec!(1299))]
fn test_rolling_window_pen_billed(
    payload: Value,
    #[case] filter: DateFilter,
    #[case] expected: rust_decimal::Decimal,
) {
    let rows = records_from_payload(&payload).unwrap();
    let invoices = normalize_all(&rows, &StatusOverrides::new());
    let period = resolve_period(&filter, today());
    let metrics = compute_metrics(&invoices, &period, &StatusRules::sunat());
    assert_eq!(metrics.pen.total_billed, expected);
}

// ============================================================================
// Test: Grouping and selection
// ============================================================================
#[rstest]
fn test_groups_and_selection(payload: Value) {
    let rows = records_from_payload(&payload).unwrap();
    let grouped = group_invoices(normalize_all(&rows, &StatusOverrides::new()));

    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped.invoice_count(), 5);

    let agro = grouped.iter().nth(1).unwrap();
    assert_eq!(agro.key.to_string(), "20100047218-SAGA FALABELLA S.A.-USD");
    assert_eq!(agro.total_amount, dec!(50));

    let mut selection = Selection::new();
    selection.toggle_group(agro);
    assert_eq!(selection.len(), 1, "credited invoice must not be selected");
    assert_eq!(selection.group_state(agro), CheckState::Checked);
}

// ============================================================================
// Test: Store ignores late responses and keeps optimistic edits
// ============================================================================
#[rstest]
fn test_store_flow(payload: Value) {
    let rows = records_from_payload(&payload).unwrap();
    let invoices = normalize_all(&rows, &StatusOverrides::new());

    let mut store = DashboardStore::new(DateFilter::ThisMonth);
    let slow = store.set_filter(DateFilter::LastThirtyDays);
    let fast = store.set_filter(DateFilter::ThisMonth);

    store.apply_fetch(fast, invoices.clone()).unwrap();
    let result = store.apply_fetch(slow, Vec::new());
    assert!(matches!(result, Err(DashboardError::StaleResponse { .. })));

    let key = invoices[1].key();
    let change = store.begin_status_change(key, "Ganada");

    let snapshot = store.snapshot(today(), &StatusRules::sunat());
    assert_eq!(snapshot.metrics.pen.total_won, dec!(300));
    assert_eq!(snapshot.metrics.pen.win_percentage, dec!(100));

    store.rollback(change).unwrap();
    let snapshot = store.snapshot(today(), &StatusRules::sunat());
    assert_eq!(snapshot.metrics.pen.total_won, dec!(100));
    assert_eq!(snapshot.groups.invoice_count(), 4);
}
