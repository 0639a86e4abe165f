//! Bulk history preparation and record decoding.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chartmill_types::{Bar, ChartmillError, Resolution, Result};
use tracing::{debug, warn};

use crate::dedupe::{collapse_duplicates, dedupe_timestamps};
use crate::raw::RawBar;
use crate::validate::{RejectionTally, validate_bar};

/// Outcome of preparing a bulk history load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Validated bars, strictly ascending by time.
    pub bars: Vec<Bar>,
    /// Number of records received.
    pub received: usize,
    /// Rejected records by reason.
    pub rejections: RejectionTally,
    /// Timestamps bumped to restore strict ordering (tick resolutions).
    pub adjusted: usize,
    /// Bars dropped as same-time duplicates (time resolutions).
    pub collapsed: usize,
}

impl IngestReport {
    /// Returns the number of records dropped by validation.
    #[must_use]
    pub const fn rejected(&self) -> usize {
        self.rejections.total()
    }
}

/// Validates, orders and deduplicates a batch of raw history records.
///
/// Records are normalized and validated individually; rejected records are
/// dropped and tallied. Survivors are stably sorted by time. For tick
/// resolutions, colliding timestamps are bumped forward one second at a time;
/// for time resolutions, same-time bars collapse to the last one delivered.
pub fn prepare_history<I>(records: I, resolution: Resolution) -> IngestReport
where
    I: IntoIterator<Item = RawBar>,
{
    let mut report = IngestReport::default();

    for record in records {
        report.received += 1;
        match validate_bar(&record) {
            Ok(bar) => report.bars.push(bar),
            Err(rejection) => {
                debug!(%rejection, ?record, "dropping malformed bar");
                report.rejections.record(&rejection);
            }
        }
    }

    report.bars.sort_by_key(|bar| bar.time);

    if resolution.is_tick() {
        report.adjusted = dedupe_timestamps(&mut report.bars);
        if report.adjusted > 0 {
            debug!(adjusted = report.adjusted, "bumped duplicate tick bar timestamps");
        }
    } else {
        report.collapsed = collapse_duplicates(&mut report.bars);
    }

    if report.rejected() > 0 {
        warn!(
            received = report.received,
            rejected = report.rejected(),
            "history contained malformed bars"
        );
    }

    report
}

/// Decodes raw records from a JSON array or newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if reading fails or the input is not valid JSON.
pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<RawBar>> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    let trimmed = input.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut records = Vec::new();
    for (line_no, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line)
            .map_err(|e| ChartmillError::Parse(format!("line {}: {e}", line_no + 1)))?;
        records.push(record);
    }
    Ok(records)
}

/// Reads raw records from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn load_records(path: &Path) -> Result<Vec<RawBar>> {
    let file = File::open(path)?;
    read_records(BufReader::new(file))
}
