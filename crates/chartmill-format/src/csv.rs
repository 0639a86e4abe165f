//! CSV output format.

use chartmill_types::ChartPoint;
use chrono::DateTime;
use std::io::Write;

use crate::formatter::series_rows;
use crate::{FormatError, Formatter};

/// CSV formatter.
///
/// Series containing Renko bricks get extra `direction` and `color` columns.
#[derive(Debug, Clone, Default)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }
}

fn iso_time(time: i64) -> String {
    DateTime::from_timestamp(time, 0).map_or_else(
        || time.to_string(),
        |dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    )
}

impl Formatter for CsvFormatter {
    fn write_series<W: Write + Send>(
        &self,
        points: &[ChartPoint],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;
        let bricks = points.iter().any(|p| p.direction().is_some());

        if self.include_header {
            write!(writer, "time{d}datetime{d}open{d}high{d}low{d}close{d}volume")?;
            if bricks {
                write!(writer, "{d}direction{d}color")?;
            }
            writeln!(writer)?;
        }

        for row in series_rows(points) {
            write!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}",
                row.time,
                iso_time(row.time),
                row.open,
                row.high,
                row.low,
                row.close,
                row.volume
            )?;
            if bricks {
                write!(
                    writer,
                    "{d}{}{d}{}",
                    row.direction.map(|s| s.to_string()).unwrap_or_default(),
                    row.color.unwrap_or_default()
                )?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}
