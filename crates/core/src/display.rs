//! Display helpers shared by the KPI cards and tables.
//!
//! Formatting mirrors the `es-PE` locale the dashboards render in: comma
//! thousands separators, a dot for decimals and narrow currency symbols.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use verificador_shared::types::Currency;

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Lowercase Spanish month name for a 1-based month number.
#[must_use]
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(index).copied()
}

/// Month and year label with the first letter capitalized, e.g. `Octubre 2025`.
#[must_use]
pub fn month_label(year: i32, month: u32) -> String {
    match month_name(month) {
        Some(name) => format!("{} {year}", capitalize_first(name)),
        None => year.to_string(),
    }
}

/// Formats a `YYYYMM` period code as a month label.
///
/// Returns `None` when the code is not six digits or the month is out of range.
#[must_use]
pub fn format_period_code(code: &str) -> Option<String> {
    if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = code[..4].parse().ok()?;
    let month: u32 = code[4..].parse().ok()?;
    month_name(month)?;
    Some(month_label(year, month))
}

/// Formats an amount as currency, e.g. `S/ 1,234.50` or `$ 980.00`.
#[must_use]
pub fn format_money(amount: Decimal, currency: Currency) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if negative { "-" } else { "" };
    format!("{sign}{} {}.{frac}", currency.symbol(), group_thousands(whole))
}

/// Formats a percentage with one decimal, e.g. `33.3%`.
#[must_use]
pub fn format_percentage(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
