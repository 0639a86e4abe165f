//! The per-view chart pipeline.

use chartmill_aggregate::{AccumulatorState, MergeOutcome, Tick, TickAccumulator, merge_point};
use chartmill_ingest::{RawBar, prepare_history, validate_bar};
use chartmill_transform::{ChartTransformer, TransformState};
use chartmill_types::{Bar, ChartPoint, ChartType, Resolution};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::feed::{FeedError, RealtimeFeed};
use crate::update::{LoadSummary, PipelineStats, SeriesUpdate};

/// Lifecycle phase of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelinePhase {
    /// No view is active.
    #[default]
    Uninitialized,
    /// A view is active and waiting for its history.
    Loading,
    /// History is loaded and realtime events are applied.
    Ready,
}

impl PipelinePhase {
    /// Returns the phase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
        }
    }
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors returned by [`ChartPipeline`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The history belongs to an activation that has since been replaced.
    #[error("stale history load (generation {ticket}, current {current})")]
    StaleLoad {
        /// Generation the load was issued for.
        ticket: u64,
        /// Current generation.
        current: u64,
    },

    /// History was delivered outside the loading phase.
    #[error("pipeline is not loading (phase: {0})")]
    NotLoading(PipelinePhase),

    /// The realtime feed failed.
    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Proof of an activation, required to deliver its history.
///
/// Each activation bumps the pipeline generation, so a fetch started for a
/// previous view cannot load into the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// Returns the generation the ticket was issued for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// The symbol, resolution and chart type being displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChartView {
    /// Instrument symbol.
    pub symbol: String,
    /// Bar resolution.
    pub resolution: Resolution,
    /// Display chart type.
    pub chart_type: ChartType,
}

impl ChartView {
    /// Creates a view.
    #[must_use]
    pub fn new(symbol: impl Into<String>, resolution: Resolution, chart_type: ChartType) -> Self {
        Self {
            symbol: symbol.into(),
            resolution,
            chart_type,
        }
    }
}

/// Per-view state built by a history load.
#[derive(Debug)]
struct Session {
    transformer: ChartTransformer,
    transform_state: TransformState,
    accumulator: Option<TickAccumulator>,
    tick_state: Option<AccumulatorState>,
    raw: Vec<Bar>,
    display: Vec<ChartPoint>,
}

/// Turns history and realtime bars into a display series for one chart view.
///
/// A pipeline moves from `Uninitialized` to `Loading` on [`activate`], and to
/// `Ready` once [`load_history`] succeeds. Activating another view discards
/// every series and transform state.
///
/// [`activate`]: ChartPipeline::activate
/// [`load_history`]: ChartPipeline::load_history
#[derive(Debug)]
pub struct ChartPipeline<F> {
    feed: F,
    config: PipelineConfig,
    generation: u64,
    phase: PipelinePhase,
    view: Option<ChartView>,
    session: Option<Session>,
    stats: PipelineStats,
}

impl<F: RealtimeFeed> ChartPipeline<F> {
    /// Creates an idle pipeline using `feed` for realtime subscriptions.
    #[must_use]
    pub fn new(feed: F, config: PipelineConfig) -> Self {
        Self {
            feed,
            config,
            generation: 0,
            phase: PipelinePhase::Uninitialized,
            view: None,
            session: None,
            stats: PipelineStats::default(),
        }
    }

    /// Switches to a new view and returns the ticket for its history load.
    ///
    /// All state of the previous view is discarded and its subscription is
    /// released.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed rejects the new subscription. The
    /// pipeline is left uninitialized in that case.
    pub fn activate(&mut self, view: ChartView) -> Result<LoadTicket, PipelineError> {
        if let Err(e) = self.release() {
            warn!(error = %e, "failed to release previous subscription");
        }

        self.feed.subscribe(&view.symbol, view.resolution)?;
        info!(
            symbol = %view.symbol,
            resolution = %view.resolution,
            chart = %view.chart_type,
            generation = self.generation,
            "activated chart view"
        );

        self.view = Some(view);
        self.phase = PipelinePhase::Loading;
        Ok(LoadTicket {
            generation: self.generation,
        })
    }

    /// Releases the active view, if any.
    ///
    /// Outstanding load tickets become stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed fails to unsubscribe. State is discarded
    /// regardless.
    pub fn deactivate(&mut self) -> Result<(), PipelineError> {
        self.release()?;
        info!(generation = self.generation, "deactivated chart view");
        Ok(())
    }

    fn release(&mut self) -> Result<(), FeedError> {
        let released = self
            .view
            .take()
            .map_or(Ok(()), |view| self.feed.unsubscribe(&view.symbol, view.resolution));
        self.session = None;
        self.stats = PipelineStats::default();
        self.phase = PipelinePhase::Uninitialized;
        self.generation += 1;
        released
    }

    /// Loads the history for the activation identified by `ticket`.
    ///
    /// Records are validated, sorted and deduplicated, then transformed in
    /// bulk for the active chart type.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::StaleLoad`] for a ticket from an earlier
    /// activation and [`PipelineError::NotLoading`] if the history was
    /// already delivered.
    pub fn load_history<I>(&mut self, ticket: LoadTicket, records: I) -> Result<LoadSummary, PipelineError>
    where
        I: IntoIterator<Item = RawBar>,
    {
        if ticket.generation != self.generation {
            debug!(ticket = ticket.generation, current = self.generation, "discarding stale history");
            return Err(PipelineError::StaleLoad {
                ticket: ticket.generation,
                current: self.generation,
            });
        }
        let view = match (&self.view, self.phase) {
            (Some(view), PipelinePhase::Loading) => view,
            _ => return Err(PipelineError::NotLoading(self.phase)),
        };

        let report = prepare_history(records, view.resolution);
        let transformer = ChartTransformer::new(view.chart_type, &self.config.renko, &report.bars);
        let (display, transform_state) = transformer.bulk(&report.bars);

        self.stats.rejected_bars += report.rejected();
        self.stats.adjusted_timestamps += report.adjusted;
        if transformer.chart_type() == ChartType::Renko {
            self.stats.emitted_bricks += display.len();
        }

        let summary = LoadSummary {
            received: report.received,
            accepted: report.bars.len(),
            rejected: report.rejected(),
            adjusted: report.adjusted,
            display_points: display.len(),
            brick_size: transformer.brick_size(),
        };

        let accumulator = TickAccumulator::for_resolution(view.resolution)
            .map(|acc| acc.with_stale_gap(self.config.ticks.stale_gap_secs));

        info!(
            symbol = %view.symbol,
            bars = summary.accepted,
            points = summary.display_points,
            rejected = summary.rejected,
            "history loaded"
        );
        if display.is_empty() {
            debug!(symbol = %view.symbol, "display series is empty after load");
        }

        self.session = Some(Session {
            transformer,
            transform_state,
            accumulator,
            tick_state: None,
            raw: report.bars,
            display,
        });
        self.phase = PipelinePhase::Ready;
        Ok(summary)
    }

    /// Applies one realtime bar event.
    ///
    /// Returns the display series changes in the order they were made. Events
    /// are ignored unless the pipeline is ready; malformed and stale bars are
    /// dropped and counted.
    pub fn on_realtime(&mut self, record: &RawBar) -> Vec<SeriesUpdate> {
        let Some(session) = self.session.as_mut() else {
            debug!(phase = %self.phase, "ignoring realtime event before history load");
            return Vec::new();
        };

        let bar = match validate_bar(record) {
            Ok(bar) => bar,
            Err(rejection) => {
                debug!(%rejection, "dropping malformed realtime bar");
                self.stats.rejected_bars += 1;
                return Vec::new();
            }
        };
        self.stats.realtime_events += 1;

        let mut updates = Vec::new();
        match session.accumulator {
            Some(acc) => {
                // the first realtime bar continues after the loaded history
                let floor = session.raw.last().map_or(i64::MIN, |last| last.time.saturating_add(1));
                let (state, completed) =
                    acc.push_after(session.tick_state, Tick::from_bar(&bar), floor);
                session.tick_state = state;
                if let Some(completed) = completed {
                    self.stats.completed_tick_bars += 1;
                    session.apply(completed, &mut self.stats, &mut updates);
                }
            }
            None => session.apply(bar, &mut self.stats, &mut updates),
        }
        updates
    }

    /// Returns the current display series.
    #[must_use]
    pub fn display_series(&self) -> &[ChartPoint] {
        self.session.as_ref().map_or(&[], |s| s.display.as_slice())
    }

    /// Returns the current raw bar series.
    #[must_use]
    pub fn raw_series(&self) -> &[Bar] {
        self.session.as_ref().map_or(&[], |s| s.raw.as_slice())
    }

    /// Returns the tick bar still being built, if any.
    #[must_use]
    pub fn forming_tick_bar(&self) -> Option<Bar> {
        self.session
            .as_ref()
            .and_then(|s| TickAccumulator::finish(s.tick_state))
    }

    /// Returns the Renko brick size in effect.
    #[must_use]
    pub fn brick_size(&self) -> Option<f64> {
        self.session.as_ref()?.transformer.brick_size()
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> PipelinePhase {
        self.phase
    }

    /// Returns the active view.
    #[must_use]
    pub const fn view(&self) -> Option<&ChartView> {
        self.view.as_ref()
    }

    /// Returns the counters for the current activation.
    #[must_use]
    pub const fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replaces the configuration used by the next activation.
    pub const fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
    }

    /// Returns the realtime feed.
    #[must_use]
    pub const fn feed(&self) -> &F {
        &self.feed
    }

    /// Returns the realtime feed mutably.
    pub const fn feed_mut(&mut self) -> &mut F {
        &mut self.feed
    }
}

impl Session {
    /// Merges one raw bar and pushes its transformed points to the display series.
    fn apply(&mut self, bar: Bar, stats: &mut PipelineStats, updates: &mut Vec<SeriesUpdate>) {
        if merge_point(&mut self.raw, bar) == MergeOutcome::Rejected {
            stats.stale_updates += 1;
            return;
        }

        let (state, points) = self.transformer.incremental(self.transform_state, &bar);
        self.transform_state = state;

        for point in points {
            if matches!(point, ChartPoint::Brick(_)) {
                stats.emitted_bricks += 1;
            }
            match merge_point(&mut self.display, point) {
                MergeOutcome::Rejected => stats.stale_updates += 1,
                outcome => updates.push(SeriesUpdate { point, outcome }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullFeed;

    fn pipeline() -> ChartPipeline<NullFeed> {
        ChartPipeline::new(NullFeed, PipelineConfig::default())
    }

    fn view() -> ChartView {
        ChartView::new("EURUSD", Resolution::Minutes(1), ChartType::Candlestick)
    }

    #[test]
    fn test_phase_transitions() {
        let mut pipeline = pipeline();
        assert_eq!(pipeline.phase(), PipelinePhase::Uninitialized);

        let ticket = pipeline.activate(view()).unwrap();
        assert_eq!(pipeline.phase(), PipelinePhase::Loading);

        pipeline.load_history(ticket, Vec::new()).unwrap();
        assert_eq!(pipeline.phase(), PipelinePhase::Ready);

        pipeline.deactivate().unwrap();
        assert_eq!(pipeline.phase(), PipelinePhase::Uninitialized);
        assert!(pipeline.view().is_none());
    }

    #[test]
    fn test_tickets_are_generational() {
        let mut pipeline = pipeline();
        let first = pipeline.activate(view()).unwrap();
        let second = pipeline.activate(view()).unwrap();
        assert!(second.generation() > first.generation());

        assert_eq!(
            pipeline.load_history(first, Vec::new()),
            Err(PipelineError::StaleLoad {
                ticket: first.generation(),
                current: second.generation(),
            })
        );
        assert_eq!(pipeline.phase(), PipelinePhase::Loading);
    }

    #[test]
    fn test_double_load_rejected() {
        let mut pipeline = pipeline();
        let ticket = pipeline.activate(view()).unwrap();
        pipeline.load_history(ticket, Vec::new()).unwrap();
        assert_eq!(
            pipeline.load_history(ticket, Vec::new()),
            Err(PipelineError::NotLoading(PipelinePhase::Ready))
        );
    }

    #[test]
    fn test_deactivate_invalidates_ticket() {
        let mut pipeline = pipeline();
        let ticket = pipeline.activate(view()).unwrap();
        pipeline.deactivate().unwrap();
        assert!(matches!(
            pipeline.load_history(ticket, Vec::new()),
            Err(PipelineError::StaleLoad { .. })
        ));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(PipelinePhase::Loading.to_string(), "loading");
        assert_eq!(
            PipelineError::NotLoading(PipelinePhase::Uninitialized).to_string(),
            "pipeline is not loading (phase: uninitialized)"
        );
    }
}
