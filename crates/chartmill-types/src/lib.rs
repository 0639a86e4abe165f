//! Core types for the chartmill chart transformation engine.
//!
//! This crate provides the fundamental data structures used throughout chartmill:
//!
//! - [`Bar`] - A time-bucketed OHLCV price sample
//! - [`RenkoBrick`] - A fixed-increment Renko brick with a [`Direction`]
//! - [`ChartPoint`] - One point of a display series
//! - [`Resolution`] - Wall-clock or tick-count bar resolution
//! - [`ChartType`] - Candlestick, Heiken-Ashi or Renko

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/chartmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod brick;
mod chart_type;
mod error;
mod point;
mod resolution;

pub use bar::Bar;
pub use brick::{BRICK_TOLERANCE, DOWN_COLOR, Direction, RenkoBrick, UP_COLOR};
pub use chart_type::{ChartType, ChartTypeParseError};
pub use error::{ChartmillError, InvalidDirection, Result};
pub use point::{ChartPoint, Timestamped};
pub use resolution::{Resolution, ResolutionParseError, ticks_per_bar};
