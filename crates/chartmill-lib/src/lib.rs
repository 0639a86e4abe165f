//! Chart transformation engine for candlestick, Heiken-Ashi and Renko views.
//!
//! This is a facade crate that re-exports functionality from the chartmill
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use chartmill_lib::prelude::*;
//!
//! let config = PipelineConfig::default()
//!     .with_renko(RenkoConfig::default().with_brick_size(10.0));
//! let mut pipeline = ChartPipeline::new(NullFeed, config);
//!
//! let ticket = pipeline
//!     .activate(ChartView::new("BTCUSD", Resolution::Minutes(1), ChartType::Renko))
//!     .unwrap();
//! let history = [100.0, 105.0, 115.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, c)| RawBar::numeric(1_700_000_000 + 60 * i as i64, *c, *c, *c, *c, 1));
//! pipeline.load_history(ticket, history).unwrap();
//! assert_eq!(pipeline.display_series().len(), 1);
//!
//! let updates = pipeline.on_realtime(&RawBar::numeric(1_700_000_180, 136.0, 136.0, 136.0, 136.0, 1));
//! assert_eq!(updates.len(), 2);
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/chartmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use chartmill_types::*;

// Re-export ingestion
pub use chartmill_ingest::{
    BarField, BarRejection, IngestReport, RawBar, RejectionTally, TimestampUnit,
    collapse_duplicates, dedupe_timestamps, load_records, normalize_timestamp, prepare_history,
    read_records, validate_bar,
};

// Re-export aggregation
pub use chartmill_aggregate::{
    AccumulatorState, DEFAULT_STALE_GAP_SECS, MergeOutcome, Tick, TickAccumulator, merge_point,
};

// Re-export transforms
pub use chartmill_transform::{
    Candlestick, ChartTransformer, DEFAULT_ATR, DEFAULT_ATR_PERIOD, FALLBACK_BRICK_SIZE,
    HeikenAshi, HeikenAshiState, RenkoConfig, RenkoEngine, RenkoState, Transform, TransformState,
    average_true_range, heiken_ashi_candle, true_ranges,
};

// Re-export the pipeline
pub use chartmill_pipeline::{
    ChartPipeline, ChartView, FeedError, LoadSummary, LoadTicket, NullFeed, PipelineConfig,
    PipelineError, PipelinePhase, PipelineStats, RealtimeFeed, SeriesUpdate, TickConfig,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use chartmill_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, SeriesRow,
    series_rows,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use chartmill_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use chartmill_lib::prelude::*;
/// ```
pub mod prelude {
    pub use chartmill_types::{
        Bar, ChartPoint, ChartType, ChartmillError, Direction, RenkoBrick, Resolution, Result,
        Timestamped,
    };

    pub use chartmill_ingest::{RawBar, load_records, prepare_history, read_records};

    pub use chartmill_aggregate::{MergeOutcome, Tick, TickAccumulator};

    pub use chartmill_transform::{ChartTransformer, HeikenAshi, RenkoConfig, RenkoEngine, Transform};

    pub use chartmill_pipeline::{
        ChartPipeline, ChartView, NullFeed, PipelineConfig, PipelineError, RealtimeFeed,
        SeriesUpdate,
    };

    #[cfg(feature = "format")]
    pub use chartmill_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use chartmill_format::ParquetFormatter;
}
