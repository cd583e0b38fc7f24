//! Coercion of statutory cell text into amounts.
//!
//! Exports print thousands with (non-breaking) spaces and negatives in
//! parentheses. Anything that still fails to parse is a missing value, never
//! an error.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::types::Cell;

/// Markers the exports use for "nothing to report".
const PLACEHOLDERS: [&str; 3] = ["-", "(-)", "—"];

/// Parse a cell such as `"1 234"`, `"(1 234)"` or `"-"`.
pub fn parse_amount(text: &str) -> Cell {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let (negative, body) = match compact.strip_prefix('(') {
        Some(rest) => (true, rest.strip_suffix(')').unwrap_or(rest)),
        None => (false, compact.as_str()),
    };

    let value = Decimal::from_str(body)
        .or_else(|_| Decimal::from_scientific(body))
        .ok()?;
    Some(if negative { -value } else { value })
}

/// Parse a market-data cell: like [`parse_amount`] but `%` signs are dropped.
pub fn parse_market_value(text: &str) -> Cell {
    parse_amount(&text.replace('%', ""))
}

/// True when the cell is blank or one of the dash placeholders.
pub fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || PLACEHOLDERS.contains(&trimmed)
}
