//! Apache Parquet output format.

use arrow::array::{Float64Array, Int8Array, StringArray, TimestampSecondArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chartmill_types::ChartPoint;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::formatter::{SeriesRow, series_rows};
use crate::{FormatError, Formatter};

/// Parquet formatter.
///
/// `direction` and `color` are nullable and stay null for candles.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn series_schema() -> Schema {
        Schema::new(vec![
            Field::new(
                "time",
                DataType::Timestamp(TimeUnit::Second, Some("UTC".into())),
                false,
            ),
            Field::new("open", DataType::Float64, false),
            Field::new("high", DataType::Float64, false),
            Field::new("low", DataType::Float64, false),
            Field::new("close", DataType::Float64, false),
            Field::new("volume", DataType::UInt64, false),
            Field::new("direction", DataType::Int8, true),
            Field::new("color", DataType::Utf8, true),
        ])
    }

    fn rows_to_batch(rows: &[SeriesRow]) -> Result<RecordBatch, FormatError> {
        let times: Vec<_> = rows.iter().map(|r| r.time).collect();
        let opens: Vec<_> = rows.iter().map(|r| r.open).collect();
        let highs: Vec<_> = rows.iter().map(|r| r.high).collect();
        let lows: Vec<_> = rows.iter().map(|r| r.low).collect();
        let closes: Vec<_> = rows.iter().map(|r| r.close).collect();
        let volumes: Vec<_> = rows.iter().map(|r| r.volume).collect();
        let directions: Vec<_> = rows.iter().map(|r| r.direction).collect();
        let colors: Vec<_> = rows.iter().map(|r| r.color).collect();

        RecordBatch::try_new(
            Arc::new(Self::series_schema()),
            vec![
                Arc::new(TimestampSecondArray::from(times).with_timezone("UTC")),
                Arc::new(Float64Array::from(opens)),
                Arc::new(Float64Array::from(highs)),
                Arc::new(Float64Array::from(lows)),
                Arc::new(Float64Array::from(closes)),
                Arc::new(UInt64Array::from(volumes)),
                Arc::new(Int8Array::from(directions)),
                Arc::new(StringArray::from(colors)),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

impl Formatter for ParquetFormatter {
    fn write_series<W: Write + Send>(
        &self,
        points: &[ChartPoint],
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(Self::series_schema());
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        let rows = series_rows(points);
        for chunk in rows.chunks(self.row_group_size.max(1)) {
            let batch = Self::rows_to_batch(chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
