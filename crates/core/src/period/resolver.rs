//! Period resolution.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::filter::DateFilter;
use crate::display::month_label;

/// Resolved reporting interval.
///
/// Both bounds are inclusive calendar dates with no timezone attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// First day included.
    pub start_date: NaiveDate,
    /// Last day included.
    pub end_date: NaiveDate,
    /// Human-readable label for the KPI header.
    pub label: String,
}

impl Period {
    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true for an inverted custom range, which no date can satisfy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_date > self.end_date
    }

    /// `YYYYMM` code of the month the period starts in.
    #[must_use]
    pub fn period_code(&self) -> String {
        format!("{:04}{:02}", self.start_date.year(), self.start_date.month())
    }
}

/// Resolves a date filter against a reference `today`.
///
/// Total: every filter, including unknown ones and inverted custom ranges,
/// produces a period.
#[must_use]
pub fn resolve_period(filter: &DateFilter, today: NaiveDate) -> Period {
    match *filter {
        DateFilter::LastFiveDays | DateFilter::LastFifteenDays | DateFilter::LastThirtyDays => {
            let days = filter.lookback_days().unwrap_or_default();
            Period {
                start_date: today
                    .checked_sub_days(Days::new(days))
                    .unwrap_or(NaiveDate::MIN),
                end_date: today,
                label: format!("Últimos {days} días"),
            }
        }
        DateFilter::Custom { start, end } => Period {
            start_date: start,
            end_date: end,
            label: format!(
                "Del {} al {}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
        },
        DateFilter::ThisMonth | DateFilter::Unknown => {
            let (start_date, end_date) = month_bounds(today);
            Period {
                start_date,
                end_date,
                label: month_label(today.year(), today.month()),
            }
        }
    }
}

/// First and last day of the month containing `date`.
fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}
