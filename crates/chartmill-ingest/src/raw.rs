//! Loosely typed bar records as delivered by data collaborators.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw bar record before validation.
///
/// Field names follow either the abbreviated (`t/o/h/l/c/v`) or the long
/// (`time/open/high/low/close/volume`) convention. Values may be numbers or
/// numeric strings; `time` may also be an RFC 3339 string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// Bar time in seconds, milliseconds, microseconds or nanoseconds.
    #[serde(default, alias = "t", alias = "timestamp")]
    pub time: Option<Value>,
    /// Opening price.
    #[serde(default, alias = "o")]
    pub open: Option<Value>,
    /// Highest price.
    #[serde(default, alias = "h")]
    pub high: Option<Value>,
    /// Lowest price.
    #[serde(default, alias = "l")]
    pub low: Option<Value>,
    /// Closing price.
    #[serde(default, alias = "c")]
    pub close: Option<Value>,
    /// Traded volume.
    #[serde(default, alias = "v")]
    pub volume: Option<Value>,
}

impl RawBar {
    /// Creates a raw record from already numeric fields.
    #[must_use]
    pub fn numeric(time: i64, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            time: Some(Value::from(time)),
            open: Some(Value::from(open)),
            high: Some(Value::from(high)),
            low: Some(Value::from(low)),
            close: Some(Value::from(close)),
            volume: Some(Value::from(volume)),
        }
    }
}

/// Result of coercing a loosely typed field to a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Coerced {
    /// The field is absent or `null`.
    Missing,
    /// The field is present but not a number or numeric string.
    NotNumeric,
    /// The numeric value (possibly non-finite).
    Number(f64),
}

/// Coerces a price or volume field.
pub(crate) fn coerce_number(value: Option<&Value>) -> Coerced {
    match value {
        None | Some(Value::Null) => Coerced::Missing,
        Some(Value::Number(n)) => n.as_f64().map_or(Coerced::NotNumeric, Coerced::Number),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_or(Coerced::NotNumeric, Coerced::Number),
        Some(_) => Coerced::NotNumeric,
    }
}

/// Coerces a time field, additionally accepting RFC 3339 strings.
///
/// RFC 3339 values are returned in seconds.
pub(crate) fn coerce_time(value: Option<&Value>) -> Coerced {
    match coerce_number(value) {
        Coerced::NotNumeric => match value {
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
                .map_or(Coerced::NotNumeric, |dt| Coerced::Number(dt.timestamp() as f64)),
            _ => Coerced::NotNumeric,
        },
        other => other,
    }
}
