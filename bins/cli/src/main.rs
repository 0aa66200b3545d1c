//! Verificador CLI
//!
//! Reads a sales export from the SUNAT backend and prints the dashboard KPIs,
//! the client/debtor groups, or the paginated invoice list for a period.

mod report;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use verificador_core::dashboard::{DashboardSnapshot, DashboardStore};
use verificador_core::invoice::{StatusOverrides, normalize_all, records_from_payload};
use verificador_core::{DateFilter, Invoice, StatusRules};
use verificador_shared::config::DashboardVariant;
use verificador_shared::types::{PageRequest, PageResponse};
use verificador_shared::{AppConfig, AppError};

#[derive(Parser)]
#[command(name = "verificador")]
#[command(version, about = "KPI and grouping reports for factoring sales exports", long_about = None)]
struct Cli {
    /// Directory holding default.toml and {RUN_MODE}.toml (default: ./config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-currency billed, won and available totals
    Kpi(QueryArgs),

    /// Invoices grouped by client, debtor and currency
    Groups(QueryArgs),

    /// Paginated invoice list
    Invoices {
        #[command(flatten)]
        query: QueryArgs,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Rows per page (default: display.page_size)
        #[arg(long)]
        per_page: Option<u32>,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// JSON export: an array of rows or an object with `items`/`data`
    #[arg(short, long)]
    input: PathBuf,

    /// Date filter: 5days, 15days, 30days, thisMonth or custom
    #[arg(short, long)]
    filter: Option<String>,

    /// Custom range start (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Custom range end (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Reference date for relative filters (default: today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Status vocabulary preset: crm or sunat
    #[arg(long)]
    variant: Option<DashboardVariant>,

    /// Lost status; replaces the preset set (can be repeated)
    #[arg(long = "lost-status", value_name = "STATUS")]
    lost_status: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli) {
        let app_error = e.downcast_ref::<AppError>();
        if let Some(app_error) = app_error {
            error!(code = app_error.error_code(), "Command failed");
        }
        eprintln!("Error: {e:#}");
        std::process::exit(app_error.map_or(1, AppError::exit_code));
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("verificador=info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_dir = cli.config_dir.unwrap_or_else(|| PathBuf::from("config"));
    let config = AppConfig::load_from(&config_dir.to_string_lossy()).map_err(AppError::from)?;
    debug!(config_dir = %config_dir.display(), variant = ?config.dashboard.variant, "Loaded configuration");

    match cli.command {
        Commands::Kpi(query) => {
            let loaded = load(&query, &config)?;
            report::print_kpi(&loaded.snapshot, query.json)
        }
        Commands::Groups(query) => {
            let loaded = load(&query, &config)?;
            report::print_groups(&loaded.snapshot, query.json)
        }
        Commands::Invoices {
            query,
            page,
            per_page,
        } => {
            let loaded = load(&query, &config)?;
            let request = PageRequest::new(page, per_page.unwrap_or(config.display.page_size));
            let in_period: Vec<Invoice> = loaded
                .store
                .invoices()
                .into_iter()
                .filter(|inv| loaded.snapshot.period.contains(inv.emission_date))
                .collect();
            let page = PageResponse::from_slice(&in_period, &request);
            report::print_invoices(&loaded.snapshot, &page, query.json)
        }
    }
}

struct Loaded {
    store: DashboardStore,
    snapshot: DashboardSnapshot,
}

fn load(query: &QueryArgs, config: &AppConfig) -> anyhow::Result<Loaded> {
    let filter = resolve_filter(query, &config.dashboard.default_filter)?;
    let rules = status_rules(query, config);
    let today = query
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let rows = read_rows(&query.input)?;
    let invoices = normalize_all(&rows, &StatusOverrides::new());
    info!(
        input = %query.input.display(),
        rows = rows.len(),
        invoices = invoices.len(),
        "Loaded sales export"
    );

    let mut store = DashboardStore::new(filter);
    let ticket = store.refresh();
    store.apply_fetch(ticket, invoices)?;
    let snapshot = store.snapshot(today, &rules);

    Ok(Loaded { store, snapshot })
}

fn resolve_filter(query: &QueryArgs, default_filter: &str) -> Result<DateFilter, AppError> {
    if let (Some(start), Some(end)) = (query.from, query.to) {
        return Ok(DateFilter::custom(start, end));
    }

    match query.filter.as_deref() {
        Some("custom") => Err(AppError::Validation(
            "--filter custom requires --from and --to".to_string(),
        )),
        Some(keyword) => Ok(DateFilter::preset(keyword)),
        None => Ok(DateFilter::preset(default_filter)),
    }
}

fn status_rules(query: &QueryArgs, config: &AppConfig) -> StatusRules {
    let mut dashboard = config.dashboard.clone();
    if let Some(variant) = query.variant {
        dashboard.variant = variant;
        dashboard.lost_statuses = None;
    }

    let rules = StatusRules::from_config(&dashboard);
    if query.lost_status.is_empty() {
        rules
    } else {
        rules.with_lost_statuses(query.lost_status.iter().cloned())
    }
}

fn read_rows(path: &Path) -> anyhow::Result<Vec<verificador_core::invoice::VentaRecord>> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            AppError::NotFound(format!("Input file not found: {}", path.display()))
        }
        _ => AppError::Io(e),
    })?;

    let payload: serde_json::Value = serde_json::from_str(&text)
        .map_err(AppError::from)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    records_from_payload(&payload)
        .map_err(|e| AppError::Validation(e.to_string()).into())
}
