//! Pipeline configuration.

use std::path::Path;

use chartmill_aggregate::DEFAULT_STALE_GAP_SECS;
use chartmill_transform::RenkoConfig;
use serde::{Deserialize, Serialize};

/// Tick-resolution options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Seconds without ticks after which a partial tick bar is closed.
    pub stale_gap_secs: i64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            stale_gap_secs: DEFAULT_STALE_GAP_SECS,
        }
    }
}

/// Configuration for a [`ChartPipeline`](crate::ChartPipeline).
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "renko": { "brick_size": 2.5 }, "ticks": { "stale_gap_secs": 10 } }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Renko brick sizing.
    pub renko: RenkoConfig,
    /// Tick bar synthesis.
    pub ticks: TickConfig,
}

impl PipelineConfig {
    /// Sets the Renko options.
    #[must_use]
    pub const fn with_renko(mut self, renko: RenkoConfig) -> Self {
        self.renko = renko;
        self
    }

    /// Sets the tick stale gap.
    #[must_use]
    pub const fn with_stale_gap(mut self, secs: i64) -> Self {
        self.ticks.stale_gap_secs = secs;
        self
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid configuration.
    pub fn from_json(input: &str) -> chartmill_types::Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> chartmill_types::Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
