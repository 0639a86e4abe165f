//! Timestamp magnitude detection and normalization to whole seconds.

/// Unit of a raw timestamp, inferred from its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampUnit {
    /// Seconds since the epoch.
    Seconds,
    /// Milliseconds since the epoch.
    Milliseconds,
    /// Microseconds since the epoch.
    Microseconds,
    /// Nanoseconds since the epoch.
    Nanoseconds,
}

impl TimestampUnit {
    /// Infers the unit of a raw epoch timestamp.
    ///
    /// Second-resolution epochs stay below `1e11` until the year 5138, so
    /// anything larger is treated as a finer unit.
    #[must_use]
    pub fn detect(raw: f64) -> Self {
        let magnitude = raw.abs();
        if magnitude >= 1e17 {
            Self::Nanoseconds
        } else if magnitude >= 1e14 {
            Self::Microseconds
        } else if magnitude >= 1e11 {
            Self::Milliseconds
        } else {
            Self::Seconds
        }
    }

    /// Returns the number of units per second.
    #[must_use]
    pub const fn per_second(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Milliseconds => 1e3,
            Self::Microseconds => 1e6,
            Self::Nanoseconds => 1e9,
        }
    }
}

/// Normalizes a raw epoch timestamp to whole seconds.
///
/// Returns `None` for non-finite input.
#[must_use]
pub fn normalize_timestamp(raw: f64) -> Option<i64> {
    if !raw.is_finite() {
        return None;
    }
    let unit = TimestampUnit::detect(raw);
    Some((raw / unit.per_second()).floor() as i64)
}
