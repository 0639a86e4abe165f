//! Acceptance rules for raw bar records.

use chartmill_types::Bar;
use chrono::DateTime;
use thiserror::Error;

use crate::raw::{Coerced, RawBar, coerce_number, coerce_time};
use crate::timestamp::normalize_timestamp;

/// A required bar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarField {
    /// Bar time.
    Time,
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    Close,
}

impl BarField {
    /// Returns the field name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
        }
    }
}

impl std::fmt::Display for BarField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a raw record was dropped.
///
/// Rejections are counted and logged by the caller; they never abort a load.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarRejection {
    /// A required field is absent or null.
    #[error("missing field '{0}'")]
    Missing(BarField),

    /// A required field is not a number.
    #[error("field '{0}' is not numeric")]
    NotNumeric(BarField),

    /// A required field is NaN or infinite.
    #[error("field '{0}' is not finite")]
    NonFinite(BarField),

    /// The normalized time is zero or negative.
    #[error("time must be positive")]
    NonPositiveTime,

    /// The normalized time is past the last representable date.
    #[error("time is out of range")]
    TimeOutOfRange,

    /// High/low do not bound open and close.
    #[error("high/low do not bound open and close")]
    InvalidRange,
}

/// Counts of rejected records by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionTally {
    /// Records with a missing required field.
    pub missing: usize,
    /// Records with a non-numeric required field.
    pub not_numeric: usize,
    /// Records with a non-finite required field.
    pub non_finite: usize,
    /// Records with a non-positive time.
    pub non_positive_time: usize,
    /// Records with a time past the representable range.
    pub time_out_of_range: usize,
    /// Records violating the OHLC relationship.
    pub invalid_range: usize,
}

impl RejectionTally {
    /// Records one rejection.
    pub const fn record(&mut self, rejection: &BarRejection) {
        match rejection {
            BarRejection::Missing(_) => self.missing += 1,
            BarRejection::NotNumeric(_) => self.not_numeric += 1,
            BarRejection::NonFinite(_) => self.non_finite += 1,
            BarRejection::NonPositiveTime => self.non_positive_time += 1,
            BarRejection::TimeOutOfRange => self.time_out_of_range += 1,
            BarRejection::InvalidRange => self.invalid_range += 1,
        }
    }

    /// Returns the total number of rejections.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.missing
            + self.not_numeric
            + self.non_finite
            + self.non_positive_time
            + self.time_out_of_range
            + self.invalid_range
    }
}

fn required(field: BarField, coerced: Coerced) -> Result<f64, BarRejection> {
    match coerced {
        Coerced::Missing => Err(BarRejection::Missing(field)),
        Coerced::NotNumeric => Err(BarRejection::NotNumeric(field)),
        Coerced::Number(n) if !n.is_finite() => Err(BarRejection::NonFinite(field)),
        Coerced::Number(n) => Ok(n),
    }
}

/// Validates a raw record and converts it to a [`Bar`].
///
/// The time is normalized to whole seconds first. `volume` defaults to 0 when
/// absent, non-numeric, negative or non-finite.
///
/// # Errors
///
/// Returns the reason the record must be dropped.
pub fn validate_bar(raw: &RawBar) -> Result<Bar, BarRejection> {
    let time = required(BarField::Time, coerce_time(raw.time.as_ref()))?;
    let open = required(BarField::Open, coerce_number(raw.open.as_ref()))?;
    let high = required(BarField::High, coerce_number(raw.high.as_ref()))?;
    let low = required(BarField::Low, coerce_number(raw.low.as_ref()))?;
    let close = required(BarField::Close, coerce_number(raw.close.as_ref()))?;

    let time = normalize_timestamp(time).ok_or(BarRejection::NonFinite(BarField::Time))?;
    if time <= 0 {
        return Err(BarRejection::NonPositiveTime);
    }
    if DateTime::from_timestamp(time, 0).is_none() {
        return Err(BarRejection::TimeOutOfRange);
    }

    let volume = match coerce_number(raw.volume.as_ref()) {
        Coerced::Number(v) if v.is_finite() && v >= 0.0 => v.floor() as u64,
        _ => 0,
    };

    let bar = Bar::new(time, open, high, low, close, volume);
    if !bar.has_valid_range() {
        return Err(BarRejection::InvalidRange);
    }
    Ok(bar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawBar {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_accepts_valid_bar() {
        let bar = validate_bar(&RawBar::numeric(1_700_000_000, 10.0, 12.0, 9.0, 11.0, 7)).unwrap();
        assert_eq!(bar, Bar::new(1_700_000_000, 10.0, 12.0, 9.0, 11.0, 7));
    }

    #[test]
    fn test_normalizes_millisecond_time() {
        let bar = validate_bar(&raw(json!({"t": 1_700_000_000_500_i64, "o": 1, "h": 1, "l": 1, "c": 1})))
            .unwrap();
        assert_eq!(bar.time, 1_700_000_000);
        assert_eq!(bar.volume, 0);
    }

    #[test]
    fn test_rejects_missing_and_non_numeric() {
        assert_eq!(
            validate_bar(&raw(json!({"time": 1, "open": 1, "high": 1, "low": 1}))),
            Err(BarRejection::Missing(BarField::Close))
        );
        assert_eq!(
            validate_bar(&raw(json!({"time": 1, "open": "abc", "high": 1, "low": 1, "close": 1}))),
            Err(BarRejection::NotNumeric(BarField::Open))
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(
            validate_bar(&raw(json!({"time": 1, "open": 1, "high": "inf", "low": 1, "close": 1}))),
            Err(BarRejection::NonFinite(BarField::High))
        );
        assert_eq!(
            validate_bar(&raw(json!({"time": 1, "open": 1, "high": 1, "low": "NaN", "close": 1}))),
            Err(BarRejection::NonFinite(BarField::Low))
        );
    }

    #[test]
    fn test_rejects_non_positive_time() {
        assert_eq!(
            validate_bar(&RawBar::numeric(0, 1.0, 1.0, 1.0, 1.0, 0)),
            Err(BarRejection::NonPositiveTime)
        );
        assert_eq!(
            validate_bar(&RawBar::numeric(-5, 1.0, 1.0, 1.0, 1.0, 0)),
            Err(BarRejection::NonPositiveTime)
        );
    }

    #[test]
    fn test_rejects_unrepresentable_time() {
        assert_eq!(
            validate_bar(&raw(json!({"t": 1e30, "o": 1, "h": 1, "l": 1, "c": 1}))),
            Err(BarRejection::TimeOutOfRange)
        );
        assert_eq!(
            validate_bar(&raw(json!({"t": "1e25", "o": 1, "h": 1, "l": 1, "c": 1}))),
            Err(BarRejection::TimeOutOfRange)
        );
    }

    #[test]
    fn test_rejects_ohlc_violations() {
        // high below close
        assert_eq!(
            validate_bar(&RawBar::numeric(1, 10.0, 10.5, 9.0, 11.0, 0)),
            Err(BarRejection::InvalidRange)
        );
        // low above open
        assert_eq!(
            validate_bar(&RawBar::numeric(1, 10.0, 12.0, 10.5, 11.0, 0)),
            Err(BarRejection::InvalidRange)
        );
        // high below low
        assert_eq!(
            validate_bar(&RawBar::numeric(1, 10.0, 9.0, 11.0, 10.0, 0)),
            Err(BarRejection::InvalidRange)
        );
    }

    #[test]
    fn test_volume_defaults() {
        let bar = validate_bar(&raw(json!({"t": 5, "o": 1, "h": 1, "l": 1, "c": 1, "v": "lots"}))).unwrap();
        assert_eq!(bar.volume, 0);
        let bar = validate_bar(&raw(json!({"t": 5, "o": 1, "h": 1, "l": 1, "c": 1, "v": -3}))).unwrap();
        assert_eq!(bar.volume, 0);
        let bar = validate_bar(&raw(json!({"t": 5, "o": 1, "h": 1, "l": 1, "c": 1, "v": 12.9}))).unwrap();
        assert_eq!(bar.volume, 12);
    }

    #[test]
    fn test_tally() {
        let mut tally = RejectionTally::default();
        tally.record(&BarRejection::InvalidRange);
        tally.record(&BarRejection::Missing(BarField::Time));
        tally.record(&BarRejection::InvalidRange);
        assert_eq!(tally.invalid_range, 2);
        assert_eq!(tally.missing, 1);
        assert_eq!(tally.total(), 3);
    }
}
