//! Display helpers shared by the command line renderers.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Employee, Transaction};

/// `₹1250.50`: fixed two decimal places behind the currency glyph.
pub fn currency(symbol: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{symbol}{:.2}", rounded)
}

/// Date portion of an ISO-8601 timestamp, or `N/A`.
pub fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn timestamp(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// `-` for missing or blank text.
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}

pub fn employee_label(employee: Option<&Employee>) -> String {
    employee
        .map(Employee::label)
        .unwrap_or_else(|| "N/A".to_string())
}

/// Upper-cased event type, as listed in an asset's history.
pub fn transaction_kind(tx: &Transaction) -> String {
    tx.kind.to_string().to_uppercase()
}
