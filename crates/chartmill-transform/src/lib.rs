//! Chart transforms for chartmill.
//!
//! This crate turns validated raw bars into display points:
//!
//! - [`HeikenAshi`] - Smoothed candles from the Heiken-Ashi recursion
//! - [`RenkoEngine`] - Fixed-size bricks, optionally sized by ATR
//! - [`ChartTransformer`] - Dispatch over the supported chart types

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/chartmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod atr;
mod heiken_ashi;
mod renko;
mod transformer;

pub use atr::{DEFAULT_ATR, DEFAULT_ATR_PERIOD, average_true_range, true_ranges};
pub use heiken_ashi::{HeikenAshi, HeikenAshiState, heiken_ashi_candle};
pub use renko::{FALLBACK_BRICK_SIZE, RenkoConfig, RenkoEngine, RenkoState};
pub use transformer::{Candlestick, ChartTransformer, Transform, TransformState};
