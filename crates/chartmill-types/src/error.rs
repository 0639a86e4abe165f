//! Error types for chartmill.

use thiserror::Error;

use crate::{ChartTypeParseError, ResolutionParseError};

/// Result type alias for chartmill operations.
pub type Result<T> = std::result::Result<T, ChartmillError>;

/// Errors surfaced to callers of the engine.
///
/// Bad market data is never reported here; it is dropped and counted.
#[derive(Error, Debug)]
pub enum ChartmillError {
    /// Unknown resolution code.
    #[error(transparent)]
    Resolution(#[from] ResolutionParseError),

    /// Unknown chart type.
    #[error(transparent)]
    ChartType(#[from] ChartTypeParseError),

    /// Input could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for brick directions other than `1` and `-1`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid brick direction {0}, expected 1 or -1")]
pub struct InvalidDirection(pub i8);
