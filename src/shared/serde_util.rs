//! Custom serde helpers for venue wire formats.
//!
//! OKX sends every number as a string and uses `""` for "not applicable";
//! these helpers turn both into `Option`s.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a decimal string, treating `""` as absent.
pub fn parse_decimal_opt(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Parse a Unix-millis string, treating `""` as absent.
pub fn parse_millis_opt(s: &str) -> Option<DateTime<Utc>> {
    s.trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Deserializes an OKX numeric string into `Option<Decimal>`.
pub mod decimal_opt {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_decimal_opt))
    }
}

/// Deserializes an OKX Unix-millis string into `Option<DateTime<Utc>>`.
pub mod millis_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_millis_opt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, with = "decimal_opt")]
        px: Option<Decimal>,
        #[serde(default, with = "millis_opt")]
        ts: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_empty_strings_become_none() {
        let row: Row = serde_json::from_str(r#"{"px":"","ts":""}"#).unwrap();
        assert!(row.px.is_none());
        assert!(row.ts.is_none());
    }

    #[test]
    fn test_values_parse() {
        let row: Row = serde_json::from_str(r#"{"px":"42150.5","ts":"1597026383085"}"#).unwrap();
        assert_eq!(row.px, Some(Decimal::from_str("42150.5").unwrap()));
        assert_eq!(row.ts.unwrap().timestamp_millis(), 1597026383085);
    }

    #[test]
    fn test_missing_fields_default() {
        let row: Row = serde_json::from_str("{}").unwrap();
        assert!(row.px.is_none());
        assert!(row.ts.is_none());
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(parse_decimal_opt("1e-4"), Some(Decimal::from_str("0.0001").unwrap()));
    }
}
