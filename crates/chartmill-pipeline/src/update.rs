//! What the pipeline reports back to its caller.

use chartmill_aggregate::MergeOutcome;
use chartmill_types::ChartPoint;
use serde::Serialize;

/// One change to the display series.
///
/// The outcome tells the renderer whether to redraw the last point or append
/// a new one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesUpdate {
    /// The point written to the display series.
    pub point: ChartPoint,
    /// Whether the point replaced the last one or was appended.
    pub outcome: MergeOutcome,
}

impl SeriesUpdate {
    /// Returns true if the point was appended.
    #[must_use]
    pub const fn is_append(&self) -> bool {
        matches!(self.outcome, MergeOutcome::Appended)
    }
}

/// Result of a bulk history load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoadSummary {
    /// Records received.
    pub received: usize,
    /// Bars that passed validation.
    pub accepted: usize,
    /// Records dropped as malformed.
    pub rejected: usize,
    /// Timestamps bumped for uniqueness.
    pub adjusted: usize,
    /// Points in the display series.
    pub display_points: usize,
    /// Renko brick size in effect, if the chart is Renko.
    pub brick_size: Option<f64>,
}

/// Running counters for one activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Malformed bars dropped, from history and realtime.
    pub rejected_bars: usize,
    /// Bulk timestamps bumped for uniqueness.
    pub adjusted_timestamps: usize,
    /// Realtime events accepted for processing.
    pub realtime_events: usize,
    /// Realtime bars or points older than the series tail.
    pub stale_updates: usize,
    /// Tick bars completed from realtime ticks.
    pub completed_tick_bars: usize,
    /// Renko bricks produced, bulk and incremental.
    pub emitted_bricks: usize,
}
