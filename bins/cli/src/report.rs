//! Table and JSON rendering for the CLI commands.

use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

use verificador_core::Invoice;
use verificador_core::dashboard::DashboardSnapshot;
use verificador_core::display::{format_money, format_percentage};
use verificador_shared::types::PageResponse;

#[derive(Tabled)]
struct KpiRow {
    #[tabled(rename = "MONEDA")]
    currency: String,
    #[tabled(rename = "FACTURADO")]
    billed: String,
    #[tabled(rename = "GANADO")]
    won: String,
    #[tabled(rename = "DISPONIBLE")]
    available: String,
    #[tabled(rename = "% GANADO")]
    win_percentage: String,
    #[tabled(rename = "FACTURAS")]
    count: u64,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "CLIENTE")]
    client: String,
    #[tabled(rename = "DEUDOR")]
    debtor: String,
    #[tabled(rename = "MONEDA")]
    currency: String,
    #[tabled(rename = "FACTURAS")]
    count: usize,
    #[tabled(rename = "TOTAL")]
    total: String,
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "FACTURA")]
    id: String,
    #[tabled(rename = "CLIENTE")]
    client: String,
    #[tabled(rename = "DEUDOR")]
    debtor: String,
    #[tabled(rename = "EMISIÓN")]
    emission_date: String,
    #[tabled(rename = "MONTO")]
    amount: String,
    #[tabled(rename = "ESTADO")]
    status: String,
}

fn print_period_header(snapshot: &DashboardSnapshot) {
    let period = &snapshot.period;
    println!(
        "Periodo: {} ({} a {})",
        period.label,
        period.start_date.format("%Y-%m-%d"),
        period.end_date.format("%Y-%m-%d")
    );
}

/// Prints the per-currency KPI table.
pub fn print_kpi(snapshot: &DashboardSnapshot, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let value = json!({ "period": snapshot.period, "metrics": snapshot.metrics });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let rows: Vec<KpiRow> = snapshot
        .metrics
        .iter()
        .map(|(currency, bucket)| KpiRow {
            currency: currency.to_string(),
            billed: format_money(bucket.total_billed, currency),
            won: format_money(bucket.total_won, currency),
            available: format_money(bucket.total_available, currency),
            win_percentage: format_percentage(bucket.win_percentage),
            count: bucket.invoice_count,
        })
        .collect();

    print_period_header(snapshot);
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

/// Prints one row per client/debtor/currency group.
pub fn print_groups(snapshot: &DashboardSnapshot, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&snapshot.groups)?);
        return Ok(());
    }

    print_period_header(snapshot);
    if snapshot.groups.is_empty() {
        println!("No hay facturas en el periodo.");
        return Ok(());
    }

    let rows: Vec<GroupRow> = snapshot
        .groups
        .iter()
        .map(|group| GroupRow {
            client: group.client_name.clone(),
            debtor: group.debtor.clone(),
            currency: group.currency.to_string(),
            count: group.invoice_count,
            total: format_money(group.total_amount, group.currency),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!(
        "{} grupos, {} facturas",
        snapshot.groups.len(),
        snapshot.groups.invoice_count()
    );
    Ok(())
}

/// Prints one page of the invoice list.
pub fn print_invoices(
    snapshot: &DashboardSnapshot,
    page: &PageResponse<Invoice>,
    as_json: bool,
) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }

    print_period_header(snapshot);
    if page.data.is_empty() {
        println!("No hay facturas en esta página.");
    } else {
        let rows: Vec<InvoiceRow> = page
            .data
            .iter()
            .map(|invoice| InvoiceRow {
                id: invoice.id.to_string(),
                client: invoice.client_name.clone(),
                debtor: invoice.debtor.clone(),
                emission_date: invoice.emission_date.format("%Y-%m-%d").to_string(),
                amount: format_money(invoice.amount, invoice.currency),
                status: invoice.status.clone(),
            })
            .collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    let meta = &page.meta;
    println!(
        "Página {} de {} ({} facturas)",
        meta.page, meta.total_pages, meta.total
    );
    Ok(())
}
