//! Raw bar ingestion for chartmill.
//!
//! This crate turns loosely typed records from data collaborators into
//! validated, ordered bars:
//!
//! - [`RawBar`] - Loosely typed input record
//! - [`normalize_timestamp`] - Seconds/ms/µs/ns detection and normalization
//! - [`validate_bar`] - Numeric and OHLC acceptance rules
//! - [`dedupe_timestamps`] - Strictly increasing timestamps for tick series
//! - [`prepare_history`] - The full bulk-load preparation

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/chartmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dedupe;
mod history;
mod raw;
mod timestamp;
mod validate;

pub use dedupe::{collapse_duplicates, dedupe_timestamps};
pub use history::{IngestReport, load_records, prepare_history, read_records};
pub use raw::RawBar;
pub use timestamp::{TimestampUnit, normalize_timestamp};
pub use validate::{BarField, BarRejection, RejectionTally, validate_bar};
