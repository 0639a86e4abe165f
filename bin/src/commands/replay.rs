//! Replay command implementation.
//!
//! Loads the head of a bar file as history, then paces the remaining records
//! through the realtime path and prints every display update.

use crate::display::{ChartArgs, describe_update};
use anyhow::{Context, Result};
use chartmill_lib::FeedError;
use chartmill_lib::prelude::*;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Feed standing in for a live connection while replaying a file.
#[derive(Debug, Default)]
struct ReplayFeed {
    subscription: Option<(String, Resolution)>,
}

impl RealtimeFeed for ReplayFeed {
    fn subscribe(&mut self, symbol: &str, resolution: Resolution) -> Result<(), FeedError> {
        info!(symbol, %resolution, "replay subscribed");
        self.subscription = Some((symbol.to_string(), resolution));
        Ok(())
    }

    fn unsubscribe(&mut self, symbol: &str, resolution: Resolution) -> Result<(), FeedError> {
        info!(symbol, %resolution, "replay unsubscribed");
        if self.subscription.take().is_none() {
            debug!(symbol, "unsubscribe without an active subscription");
        }
        Ok(())
    }
}

/// Replay a bar file through the realtime path.
pub(crate) async fn replay(
    input: &Path,
    chart: &ChartArgs,
    config: PipelineConfig,
    history: usize,
    interval_ms: u64,
    quiet: bool,
) -> Result<()> {
    let mut records = load_records(input)
        .with_context(|| format!("Failed to read bars from {}", input.display()))?;
    let live = records.split_off(history.min(records.len()));

    let mut pipeline = ChartPipeline::new(ReplayFeed::default(), config);
    let ticket = pipeline.activate(chart.view(input))?;
    let summary = pipeline.load_history(ticket, records)?;

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(live.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} events {msg}")
                .context("Invalid progress template")?
                .progress_chars("=>-"),
        );
        pb.set_message(format!("{} history points", summary.display_points));
        pb
    };

    let pace = Duration::from_millis(interval_ms);
    let mut events = futures::stream::iter(live)
        .then(|record| async move {
            if !pace.is_zero() {
                tokio::time::sleep(pace).await;
            }
            record
        })
        .boxed();

    while let Some(record) = events.next().await {
        for update in pipeline.on_realtime(&record) {
            if !quiet {
                progress.println(describe_update(&update));
            }
        }
        progress.inc(1);
    }

    let stats = *pipeline.stats();
    progress.finish_with_message(format!(
        "{} points, {} stale, {} rejected",
        pipeline.display_series().len(),
        stats.stale_updates,
        stats.rejected_bars
    ));

    if let Some(bar) = pipeline.forming_tick_bar() {
        info!(time = bar.time, close = bar.close, "tick bar still forming at end of replay");
    }
    if !quiet {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    pipeline.deactivate()?;
    Ok(())
}
