//! Chart type definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Visual representation of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    /// Plain OHLC candlesticks.
    #[default]
    Candlestick,
    /// Heiken-Ashi smoothed candles.
    HeikenAshi,
    /// Renko bricks.
    Renko,
}

impl ChartType {
    /// Returns the chart type as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Candlestick => "candlestick",
            Self::HeikenAshi => "heiken-ashi",
            Self::Renko => "renko",
        }
    }

    /// Returns all available chart types.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Candlestick, Self::HeikenAshi, Self::Renko]
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ChartTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "candlestick" | "candles" | "candle" => Ok(Self::Candlestick),
            "heiken-ashi" | "heikenashi" | "heikin-ashi" | "heikinashi" | "ha" => {
                Ok(Self::HeikenAshi)
            }
            "renko" => Ok(Self::Renko),
            _ => Err(ChartTypeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid chart type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTypeParseError(String);

impl std::fmt::Display for ChartTypeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid chart type '{}', expected one of: candlestick, heiken-ashi, renko",
            self.0
        )
    }
}

impl std::error::Error for ChartTypeParseError {}
