//! JSON and NDJSON series output.

use chartmill_types::ChartPoint;
use std::io::Write;

use crate::formatter::{SeriesRow, series_rows};
use crate::{FormatError, Formatter};

/// Layout of the JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// One array holding every row.
    #[default]
    Array,
    /// One object per line.
    Ndjson,
}

impl JsonStyle {
    const fn extension(self) -> &'static str {
        match self {
            Self::Array => "json",
            Self::Ndjson => "ndjson",
        }
    }
}

/// Writes a display series as JSON objects.
///
/// Every row carries `time`, the four prices and `volume`. Brick rows also
/// carry `direction` (`1` or `-1`) and `color`, which candle rows omit.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
    pretty: bool,
}

impl JsonFormatter {
    /// Array output, compact.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_layout(JsonStyle::Array)
    }

    /// Line-delimited output.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self::with_layout(JsonStyle::Ndjson)
    }

    const fn with_layout(style: JsonStyle) -> Self {
        Self { style, pretty: false }
    }

    /// Indents array output. Ignored for NDJSON, where a row must fit on one line.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Switches the document layout.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    fn write_lines<W: Write>(rows: &[SeriesRow], mut writer: W) -> Result<(), FormatError> {
        for row in rows {
            serde_json::to_writer(&mut writer, row)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_series<W: Write + Send>(
        &self,
        points: &[ChartPoint],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let rows = series_rows(points);
        if self.style == JsonStyle::Ndjson {
            return Self::write_lines(&rows, writer);
        }

        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &rows)?;
        } else {
            serde_json::to_writer(&mut writer, &rows)?;
        }
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn extension(&self) -> &str {
        self.style.extension()
    }
}
