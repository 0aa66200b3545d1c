//! Status classification rules.

use std::collections::BTreeSet;

use verificador_shared::config::{DashboardConfig, DashboardVariant};

use crate::invoice::STATUS_WON;

/// Lost statuses used by the CRM dashboard.
pub const CRM_LOST_STATUSES: [&str; 4] = ["Tasa", "Riesgo", "Perdida sin gestión", "No califica"];

/// Lost statuses used by the SUNAT sales viewer.
pub const SUNAT_LOST_STATUSES: [&str; 1] = ["Perdida"];

/// How a status label counts toward the KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Counts toward `total_won`.
    Won,
    /// Excluded from `total_available`.
    Lost,
    /// Still in the pipeline. Unknown labels land here.
    Available,
}

/// Won label plus the set of labels that close an opportunity as lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRules {
    won_status: String,
    lost_statuses: BTreeSet<String>,
}

impl StatusRules {
    /// Creates rules from an explicit won label and lost set.
    #[must_use]
    pub fn new<I, S>(won_status: impl Into<String>, lost_statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            won_status: won_status.into(),
            lost_statuses: lost_statuses.into_iter().map(Into::into).collect(),
        }
    }

    /// CRM dashboard vocabulary.
    #[must_use]
    pub fn crm() -> Self {
        Self::new(STATUS_WON, CRM_LOST_STATUSES)
    }

    /// SUNAT sales viewer vocabulary.
    #[must_use]
    pub fn sunat() -> Self {
        Self::new(STATUS_WON, SUNAT_LOST_STATUSES)
    }

    /// Preset for a dashboard variant.
    #[must_use]
    pub fn for_variant(variant: DashboardVariant) -> Self {
        match variant {
            DashboardVariant::Crm => Self::crm(),
            DashboardVariant::Sunat => Self::sunat(),
        }
    }

    /// Builds rules from configuration; an explicit lost list replaces the preset.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        match &config.lost_statuses {
            Some(lost) => Self::new(config.won_status.clone(), lost.iter().cloned()),
            None => Self {
                won_status: config.won_status.clone(),
                ..Self::for_variant(config.variant)
            },
        }
    }

    /// Returns a copy with a different lost set.
    #[must_use]
    pub fn with_lost_statuses<I, S>(self, lost_statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(self.won_status, lost_statuses)
    }

    /// The won label.
    #[must_use]
    pub fn won_status(&self) -> &str {
        &self.won_status
    }

    /// The lost labels in sorted order.
    pub fn lost_statuses(&self) -> impl Iterator<Item = &str> {
        self.lost_statuses.iter().map(String::as_str)
    }

    /// Classifies a status label. Won takes precedence if a label is in both sets.
    #[must_use]
    pub fn classify(&self, status: &str) -> StatusClass {
        if status == self.won_status {
            StatusClass::Won
        } else if self.lost_statuses.contains(status) {
            StatusClass::Lost
        } else {
            StatusClass::Available
        }
    }
}

impl Default for StatusRules {
    fn default() -> Self {
        Self::sunat()
    }
}
