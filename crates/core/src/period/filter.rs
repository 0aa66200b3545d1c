//! Date filter descriptor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User-selected date filter.
///
/// Serialized with a `type` tag matching the dashboards' wire shape:
/// `{"type": "5days"}` or `{"type": "custom", "start": "2025-10-01", "end": "2025-10-15"}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DateFilter {
    /// Last 5 days up to today.
    #[serde(rename = "5days")]
    LastFiveDays,
    /// Last 15 days up to today.
    #[serde(rename = "15days")]
    LastFifteenDays,
    /// Last 30 days up to today.
    #[serde(rename = "30days")]
    LastThirtyDays,
    /// Calendar month containing today.
    #[default]
    #[serde(rename = "thisMonth")]
    ThisMonth,
    /// Explicit inclusive range.
    #[serde(rename = "custom")]
    Custom {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },
    /// Any type tag this build does not know; resolves like `ThisMonth`.
    #[serde(other)]
    Unknown,
}

impl DateFilter {
    /// Builds a preset filter from its keyword.
    ///
    /// Unrecognized keywords map to `Unknown` rather than failing.
    #[must_use]
    pub fn preset(keyword: &str) -> Self {
        match keyword.trim() {
            "5days" => Self::LastFiveDays,
            "15days" => Self::LastFifteenDays,
            "30days" => Self::LastThirtyDays,
            "thisMonth" => Self::ThisMonth,
            _ => Self::Unknown,
        }
    }

    /// Builds a custom range filter. `start > end` is allowed and yields an empty period.
    #[must_use]
    pub const fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Custom { start, end }
    }

    /// Parses a filter out of an arbitrary JSON value.
    ///
    /// Missing or malformed descriptors fall back to `ThisMonth`.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Number of days a rolling preset looks back, if this is one.
    #[must_use]
    pub const fn lookback_days(&self) -> Option<u64> {
        match self {
            Self::LastFiveDays => Some(5),
            Self::LastFifteenDays => Some(15),
            Self::LastThirtyDays => Some(30),
            Self::ThisMonth | Self::Custom { .. } | Self::Unknown => None,
        }
    }

    /// Wire keyword of this filter's type tag.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::LastFiveDays => "5days",
            Self::LastFifteenDays => "15days",
            Self::LastThirtyDays => "30days",
            Self::ThisMonth | Self::Unknown => "thisMonth",
            Self::Custom { .. } => "custom",
        }
    }
}
