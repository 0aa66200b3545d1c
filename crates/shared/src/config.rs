//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// KPI dashboard configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Table display configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Which dashboard's status vocabulary the KPIs should follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardVariant {
    /// CRM dashboard: several statuses count as lost.
    Crm,
    /// SUNAT sales viewer: only "Perdida" counts as lost.
    #[default]
    Sunat,
}

impl std::str::FromStr for DashboardVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crm" => Ok(Self::Crm),
            "sunat" => Ok(Self::Sunat),
            _ => Err(format!("Unknown dashboard variant: {s}")),
        }
    }
}

/// KPI dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Status vocabulary preset.
    #[serde(default)]
    pub variant: DashboardVariant,
    /// Explicit lost-status set; overrides the preset when present.
    #[serde(default)]
    pub lost_statuses: Option<Vec<String>>,
    /// Status label that marks an invoice as won.
    #[serde(default = "default_won_status")]
    pub won_status: String,
    /// Date filter preset applied when none is given.
    #[serde(default = "default_filter")]
    pub default_filter: String,
}

fn default_won_status() -> String {
    "Ganada".to_string()
}

fn default_filter() -> String {
    "thisMonth".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            variant: DashboardVariant::default(),
            lost_statuses: None,
            won_status: default_won_status(),
            default_filter: default_filter(),
        }
    }
}

/// Table display configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Rows per page in the detailed invoice list.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    20
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files under `./config`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Loads configuration with `base_dir` as the config file directory.
    ///
    /// Sources, lowest priority first: `{base_dir}/default.*`,
    /// `{base_dir}/{RUN_MODE}.*` and `VERIFICADOR__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    pub fn load_from(base_dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{base_dir}/default")).required(false))
            .add_source(
                config::File::with_name(&format!("{base_dir}/{run_mode}")).required(false),
            )
            .add_source(
                config::Environment::with_prefix("VERIFICADOR")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("dashboard.lost_statuses")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
