//! Shared arguments and output helpers for the chartmill CLI.

use anyhow::{Context, Result};
use chartmill_lib::prelude::*;
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Output format for chart series.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Chart selection shared by the convert and replay commands.
#[derive(Args)]
pub(crate) struct ChartArgs {
    /// Resolution code (e.g. 1, 5m, 4H, 1D, 100T)
    #[arg(short, long, default_value = "1")]
    pub(crate) resolution: Resolution,

    /// Chart type (candlestick, heiken-ashi, renko)
    #[arg(short, long, default_value = "candlestick")]
    pub(crate) chart: ChartType,

    /// Symbol label. Defaults to the input file stem
    #[arg(long)]
    pub(crate) symbol: Option<String>,

    /// Fixed Renko brick size
    #[arg(long)]
    pub(crate) brick_size: Option<f64>,

    /// Size Renko bricks from the Average True Range
    #[arg(long)]
    pub(crate) atr: bool,

    /// Number of True Range samples for ATR sizing
    #[arg(long)]
    pub(crate) atr_period: Option<usize>,
}

impl ChartArgs {
    /// Builds the pipeline configuration from an optional file and the flags.
    pub(crate) fn pipeline_config(&self, path: Option<&Path>) -> Result<PipelineConfig> {
        let mut config = match path {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("Invalid config file: {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(size) = self.brick_size {
            config.renko = config.renko.with_brick_size(size);
        }
        if let Some(period) = self.atr_period {
            config.renko.atr_period = period;
        }
        if self.atr {
            config.renko = config.renko.with_atr(config.renko.atr_period);
        }
        Ok(config)
    }

    /// Returns the view for an input file.
    pub(crate) fn view(&self, input: &Path) -> ChartView {
        let symbol = self.symbol.clone().unwrap_or_else(|| {
            input
                .file_stem()
                .map_or_else(|| "chart".to_string(), |s| s.to_string_lossy().into_owned())
        });
        ChartView::new(symbol, self.resolution, self.chart)
    }
}

/// Returns `<input stem>.<chart>.<ext>` next to the input.
pub(crate) fn default_output(input: &Path, chart: ChartType, format: Format) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "chart".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}.{chart}.{}", format.extension()))
}

/// Write a display series to a file in the specified format.
pub(crate) fn write_series(points: &[ChartPoint], output: &Path, format: Format) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let writer = BufWriter::new(file);

    match format {
        Format::Csv => {
            let formatter = CsvFormatter::new();
            formatter.write_series(points, writer)?;
        }
        Format::Json => {
            let formatter = JsonFormatter::new();
            formatter.write_series(points, writer)?;
        }
        Format::Ndjson => {
            let formatter = JsonFormatter::ndjson();
            formatter.write_series(points, writer)?;
        }
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                let formatter = ParquetFormatter::new();
                formatter.write_series(points, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                anyhow::bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

/// Renders one series update as a single line.
pub(crate) fn describe_update(update: &SeriesUpdate) -> String {
    let bar = update.point.as_bar();
    let direction = match update.point.direction() {
        Some(Direction::Up) => " up",
        Some(Direction::Down) => " down",
        None => "",
    };
    format!(
        "{:<8} {} o={} h={} l={} c={} v={}{direction}",
        update.outcome.as_str(),
        bar.time, bar.open, bar.high, bar.low, bar.close, bar.volume
    )
}
