//! Convert command implementation.
//!
//! Runs a bulk load through the pipeline and writes the display series.

use crate::display::{ChartArgs, Format, default_output, write_series};
use anyhow::{Context, Result};
use chartmill_lib::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Convert a bar file into a chart series file.
pub(crate) fn convert(
    input: &Path,
    chart: &ChartArgs,
    config: PipelineConfig,
    output: Option<PathBuf>,
    format: Format,
    quiet: bool,
) -> Result<()> {
    let records = load_records(input)
        .with_context(|| format!("Failed to read bars from {}", input.display()))?;

    let mut pipeline = ChartPipeline::new(NullFeed, config);
    let ticket = pipeline.activate(chart.view(input))?;
    let summary = pipeline.load_history(ticket, records)?;
    info!(?summary, "bulk load finished");

    let output = output.unwrap_or_else(|| default_output(input, chart.chart, format));
    write_series(pipeline.display_series(), &output, format)?;

    if !quiet {
        println!(
            "Loaded {} of {} bars ({} rejected, {} timestamps adjusted)",
            summary.accepted, summary.received, summary.rejected, summary.adjusted
        );
        if let Some(size) = summary.brick_size {
            println!("Brick size: {size}");
        }
        if summary.display_points == 0 {
            println!("No data to display");
        }
        println!(
            "Wrote {} {} points to: {}",
            summary.display_points,
            chart.chart,
            output.display()
        );
    }

    Ok(())
}
