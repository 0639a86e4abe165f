//! Chart resolution definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Bar resolution of a chart, either wall-clock or tick-count based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Resolution {
    /// N-second bars.
    Seconds(u32),
    /// N-minute bars.
    Minutes(u32),
    /// N-hour bars.
    Hours(u32),
    /// N-day bars.
    Days(u32),
    /// N-week bars.
    Weeks(u32),
    /// Bars synthesized from a fixed number of trade ticks.
    Ticks(u32),
}

impl Default for Resolution {
    fn default() -> Self {
        Self::Minutes(1)
    }
}

impl Resolution {
    /// Returns the bucket width in seconds, or None for tick resolutions.
    #[must_use]
    pub const fn seconds(&self) -> Option<u64> {
        match *self {
            Self::Seconds(n) => Some(n as u64),
            Self::Minutes(n) => Some(n as u64 * 60),
            Self::Hours(n) => Some(n as u64 * 3600),
            Self::Days(n) => Some(n as u64 * 86_400),
            Self::Weeks(n) => Some(n as u64 * 604_800),
            Self::Ticks(_) => None,
        }
    }

    /// Returns true if this is a tick-count resolution.
    #[must_use]
    pub const fn is_tick(&self) -> bool {
        matches!(self, Self::Ticks(_))
    }

    /// Returns the number of ticks per bar for tick resolutions.
    ///
    /// See [`ticks_per_bar`] for the mapping.
    #[must_use]
    pub const fn ticks_per_bar(&self) -> Option<u32> {
        match *self {
            Self::Ticks(n) => Some(ticks_per_bar(n)),
            _ => None,
        }
    }

    /// Returns the canonical resolution code.
    #[must_use]
    pub fn code(&self) -> String {
        match *self {
            Self::Seconds(n) => format!("{n}S"),
            Self::Minutes(n) => n.to_string(),
            Self::Hours(n) => format!("{n}H"),
            Self::Days(n) => format!("{n}D"),
            Self::Weeks(n) => format!("{n}W"),
            Self::Ticks(n) => format!("{n}T"),
        }
    }

    /// Returns a set of commonly used resolutions.
    #[must_use]
    pub const fn common() -> &'static [Self] {
        &[
            Self::Ticks(100),
            Self::Ticks(500),
            Self::Ticks(1000),
            Self::Ticks(5000),
            Self::Seconds(30),
            Self::Minutes(1),
            Self::Minutes(5),
            Self::Minutes(15),
            Self::Minutes(30),
            Self::Hours(1),
            Self::Hours(4),
            Self::Days(1),
            Self::Weeks(1),
        ]
    }
}

/// Maps a tick resolution value to the number of raw ticks per synthetic bar.
///
/// Known values use a fixed table (`100 -> 5`, `500 -> 15`, `1000 -> 25`,
/// `5000 -> 50`); anything else is `tick_value / 20` clamped to `5..=50`.
#[must_use]
pub const fn ticks_per_bar(tick_value: u32) -> u32 {
    match tick_value {
        100 => 5,
        500 => 15,
        1000 => 25,
        5000 => 50,
        other => {
            let scaled = other / 20;
            if scaled < 5 {
                5
            } else if scaled > 50 {
                50
            } else {
                scaled
            }
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        let err = || ResolutionParseError(s.to_string());

        if code.is_empty() {
            return Err(err());
        }

        // Bare integers are minutes.
        if code.bytes().all(|b| b.is_ascii_digit()) {
            return parse_count(&code).map(Self::Minutes).ok_or_else(err);
        }

        // Tick-count marker.
        for suffix in ["ticks", "tick", "t"] {
            if let Some(count) = code.strip_suffix(suffix) {
                return parse_count(count).map(Self::Ticks).ok_or_else(err);
            }
        }

        // Either "5m" or "m5".
        let (count, unit) = if code.starts_with(|c: char| c.is_ascii_digit()) {
            let split = code
                .find(|c: char| !c.is_ascii_digit())
                .ok_or_else(err)?;
            (&code[..split], &code[split..])
        } else {
            let split = code
                .find(|c: char| c.is_ascii_digit())
                .ok_or_else(err)?;
            (&code[split..], &code[..split])
        };

        let count = parse_count(count).ok_or_else(err)?;
        match unit {
            "s" | "sec" | "second" => Ok(Self::Seconds(count)),
            "m" | "min" | "minute" => Ok(Self::Minutes(count)),
            "h" | "hour" => Ok(Self::Hours(count)),
            "d" | "day" => Ok(Self::Days(count)),
            "w" | "week" => Ok(Self::Weeks(count)),
            _ => Err(err()),
        }
    }
}

fn parse_count(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().filter(|n| *n > 0)
}

impl TryFrom<String> for Resolution {
    type Error = ResolutionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(resolution: Resolution) -> Self {
        resolution.code()
    }
}

/// Error returned when parsing an invalid resolution code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionParseError(String);

impl std::fmt::Display for ResolutionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid resolution '{}', expected e.g. 100T, 30S, 1, 5m, 4H, 1D, 1W",
            self.0
        )
    }
}

impl std::error::Error for ResolutionParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_parse() {
        assert_eq!("1".parse::<Resolution>().unwrap(), Resolution::Minutes(1));
        assert_eq!("15".parse::<Resolution>().unwrap(), Resolution::Minutes(15));
        assert_eq!("100T".parse::<Resolution>().unwrap(), Resolution::Ticks(100));
        assert_eq!("500ticks".parse::<Resolution>().unwrap(), Resolution::Ticks(500));
        assert_eq!("30S".parse::<Resolution>().unwrap(), Resolution::Seconds(30));
        assert_eq!("4H".parse::<Resolution>().unwrap(), Resolution::Hours(4));
        assert_eq!("m5".parse::<Resolution>().unwrap(), Resolution::Minutes(5));
        assert_eq!("1D".parse::<Resolution>().unwrap(), Resolution::Days(1));
        assert_eq!("1w".parse::<Resolution>().unwrap(), Resolution::Weeks(1));
    }

    #[test]
    fn test_resolution_parse_errors() {
        assert!("".parse::<Resolution>().is_err());
        assert!("0".parse::<Resolution>().is_err());
        assert!("0T".parse::<Resolution>().is_err());
        assert!("T".parse::<Resolution>().is_err());
        assert!("5x".parse::<Resolution>().is_err());
        assert!("daily".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_code_round_trip() {
        for resolution in Resolution::common() {
            assert_eq!(resolution.code().parse::<Resolution>().unwrap(), *resolution);
        }
    }

    #[test]
    fn test_resolution_seconds() {
        assert_eq!(Resolution::Ticks(100).seconds(), None);
        assert_eq!(Resolution::Minutes(5).seconds(), Some(300));
        assert_eq!(Resolution::Hours(1).seconds(), Some(3600));
        assert_eq!(Resolution::Days(1).seconds(), Some(86_400));
    }

    #[test]
    fn test_ticks_per_bar_table() {
        assert_eq!(ticks_per_bar(100), 5);
        assert_eq!(ticks_per_bar(500), 15);
        assert_eq!(ticks_per_bar(1000), 25);
        assert_eq!(ticks_per_bar(5000), 50);
    }

    #[test]
    fn test_ticks_per_bar_fallback() {
        assert_eq!(ticks_per_bar(10), 5);
        assert_eq!(ticks_per_bar(200), 10);
        assert_eq!(ticks_per_bar(2000), 50);
        assert_eq!(Resolution::Ticks(300).ticks_per_bar(), Some(15));
        assert_eq!(Resolution::Minutes(1).ticks_per_bar(), None);
    }

    #[test]
    fn test_resolution_serde() {
        let json = serde_json::to_string(&Resolution::Ticks(100)).unwrap();
        assert_eq!(json, "\"100T\"");
        let parsed: Resolution = serde_json::from_str("\"5m\"").unwrap();
        assert_eq!(parsed, Resolution::Minutes(5));
    }
}
