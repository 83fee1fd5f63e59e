use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use tax_core::calculations::common::{group_thousands, round_half_up};
use thiserror::Error;

/// Plain non-negative amount once grouping commas are removed.
static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("amount pattern is valid"));

/// Error returned when entered text is not an income amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseIncomeError {
    #[error("'{0}' is not an amount; use digits with optional commas and decimals")]
    NotANumber(String),

    #[error("'{0}' is too large")]
    OutOfRange(String),
}

/// Normalizes input for parsing: trims whitespace and removes commas (thousands separator).
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses an entered income.
///
/// Handles comma as thousands separator (e.g. `"5,000,000"`).
/// Empty or whitespace-only input is treated as 0. Signs, letters and
/// exponents are rejected, so the result is never negative.
pub fn parse_income(s: &str) -> Result<Decimal, ParseIncomeError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    if !AMOUNT.is_match(&normalized) {
        tracing::warn!(input = %s, "rejected income input");
        return Err(ParseIncomeError::NotANumber(s.to_string()));
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "income out of range: {}", e);
        ParseIncomeError::OutOfRange(s.to_string())
    })
}

/// Formats an amount as currency: two decimals, half-up, grouped
/// thousands, e.g. `₦1,234,567.50`.
pub fn format_currency(
    amount: Decimal,
    currency_symbol: &str,
) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let whole = group_thousands(rounded.abs().trunc());
    let cents = (rounded.abs().fract() * Decimal::ONE_HUNDRED).trunc();
    format!("{sign}{currency_symbol}{whole}.{:0>2}", cents.to_string())
}

/// Formats a percentage with two decimals, e.g. `7.68%`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{:.2}%", round_half_up(rate))
}
