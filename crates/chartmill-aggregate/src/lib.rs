//! Stream aggregation for chartmill.
//!
//! This crate provides the realtime building blocks:
//!
//! - [`TickAccumulator`] - Synthesizes fixed-tick-count bars from ticks
//! - [`merge_point`] - Update-last or append merging into an ordered series

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/chartmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod accumulator;
mod merge;

pub use accumulator::{AccumulatorState, DEFAULT_STALE_GAP_SECS, Tick, TickAccumulator};
pub use merge::{MergeOutcome, merge_point};
