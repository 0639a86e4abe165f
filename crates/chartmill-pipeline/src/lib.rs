//! Chart pipeline orchestration for chartmill.
//!
//! This crate wires ingestion, aggregation and transforms together:
//!
//! - [`ChartPipeline`] - Per-view state machine for bulk loads and realtime events
//! - [`RealtimeFeed`] - Injected subscription collaborator
//! - [`PipelineConfig`] - Renko and tick options, loadable from JSON
//! - [`SeriesUpdate`] - Update-or-append decisions for the renderer

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/chartmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod feed;
mod pipeline;
mod update;

pub use config::{PipelineConfig, TickConfig};
pub use feed::{FeedError, NullFeed, RealtimeFeed};
pub use pipeline::{ChartPipeline, ChartView, LoadTicket, PipelineError, PipelinePhase};
pub use update::{LoadSummary, PipelineStats, SeriesUpdate};
