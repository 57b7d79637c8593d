//! Lenient decoding for the registry's loosely typed JSON fields.
//!
//! Dates arrive as bare dates, full timestamps, empty strings or null.
//! Prices arrive as numbers or numeric strings, sometimes empty.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

/// Parses an ISO-8601 date or timestamp. Bare dates and timestamps without an
/// offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {s}"))),
    }
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
}

pub fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_decimal(s.trim()).map(Some).map_err(D::Error::custom),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()).map(Some).map_err(D::Error::custom),
        Some(other) => Err(D::Error::custom(format!("invalid decimal: {other}"))),
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| format!("invalid decimal {raw}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
        when: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "deserialize_optional_decimal")]
        price: Option<Decimal>,
    }

    fn sample(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn bare_date_is_utc_midnight() {
        let p = sample(r#"{"when": "2024-03-01"}"#);
        assert_eq!(p.when, Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn full_timestamps_keep_their_offset() {
        let p = sample(r#"{"when": "2024-03-01T10:30:00.000+02:00"}"#);
        assert_eq!(p.when, Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()));

        let p = sample(r#"{"when": "2024-03-01T10:30:00"}"#);
        assert_eq!(p.when, Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap()));
    }

    #[test]
    fn empty_and_missing_values_are_absent() {
        let p = sample(r#"{"when": "", "price": ""}"#);
        assert!(p.when.is_none());
        assert!(p.price.is_none());

        let p = sample(r#"{"when": null, "price": null}"#);
        assert!(p.when.is_none());
        assert!(p.price.is_none());

        let p = sample("{}");
        assert!(p.when.is_none());
        assert!(p.price.is_none());
    }

    #[test]
    fn prices_accept_numbers_and_strings() {
        assert_eq!(sample(r#"{"price": 1250.5}"#).price, Some(dec!(1250.5)));
        assert_eq!(sample(r#"{"price": "899.99"}"#).price, Some(dec!(899.99)));
        assert_eq!(sample(r#"{"price": 42}"#).price, Some(dec!(42)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(serde_json::from_str::<Sample>(r#"{"when": "yesterday"}"#).is_err());
        assert!(serde_json::from_str::<Sample>(r#"{"price": "cheap"}"#).is_err());
    }
}
