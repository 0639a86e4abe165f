//! The chart-type strategy shared by bulk loads and realtime updates.

use chartmill_types::{Bar, ChartPoint, ChartType};
use tracing::debug;

use crate::heiken_ashi::{HeikenAshi, HeikenAshiState};
use crate::renko::{RenkoConfig, RenkoEngine, RenkoState};

/// Turns raw bars into display points.
///
/// `bulk` handles a whole history and returns the state needed to continue it;
/// `incremental` folds one realtime bar into that state. Both are pure.
pub trait Transform {
    /// State carried between incremental calls.
    type State: Clone + std::fmt::Debug;

    /// Display point type produced.
    type Output: Into<ChartPoint>;

    /// Transforms a full, ascending history.
    fn bulk(&self, bars: &[Bar]) -> (Vec<Self::Output>, Self::State);

    /// Transforms one realtime bar.
    fn incremental(&self, state: Self::State, bar: &Bar) -> (Self::State, Vec<Self::Output>);
}

/// Pass-through transform for plain candlesticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Candlestick;

impl Transform for Candlestick {
    type State = ();
    type Output = Bar;

    fn bulk(&self, bars: &[Bar]) -> (Vec<Bar>, ()) {
        (bars.to_vec(), ())
    }

    fn incremental(&self, _state: (), bar: &Bar) -> ((), Vec<Bar>) {
        ((), vec![*bar])
    }
}

/// State of whichever transform is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformState {
    /// Candlesticks carry no state.
    Candlestick,
    /// Heiken-Ashi recursion state.
    HeikenAshi(HeikenAshiState),
    /// Renko brick state.
    Renko(RenkoState),
}

/// The transform selected for a chart type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartTransformer {
    /// Raw candles.
    Candlestick,
    /// Heiken-Ashi candles.
    HeikenAshi,
    /// Renko bricks with a resolved size.
    Renko(RenkoEngine),
}

fn points<T: Into<ChartPoint>>(items: Vec<T>) -> Vec<ChartPoint> {
    items.into_iter().map(Into::into).collect()
}

impl ChartTransformer {
    /// Selects the transform for `chart_type`.
    ///
    /// The Renko brick size is resolved once against `history`.
    #[must_use]
    pub fn new(chart_type: ChartType, renko: &RenkoConfig, history: &[Bar]) -> Self {
        match chart_type {
            ChartType::Candlestick => Self::Candlestick,
            ChartType::HeikenAshi => Self::HeikenAshi,
            ChartType::Renko => Self::Renko(RenkoEngine::from_config(renko, history)),
        }
    }

    /// Returns the chart type served.
    #[must_use]
    pub const fn chart_type(&self) -> ChartType {
        match self {
            Self::Candlestick => ChartType::Candlestick,
            Self::HeikenAshi => ChartType::HeikenAshi,
            Self::Renko(_) => ChartType::Renko,
        }
    }

    /// Returns the Renko brick size, if this is a Renko transform.
    #[must_use]
    pub const fn brick_size(&self) -> Option<f64> {
        match self {
            Self::Renko(engine) => Some(engine.brick_size()),
            _ => None,
        }
    }

    /// Returns the state before any bar has been seen.
    #[must_use]
    pub fn initial_state(&self) -> TransformState {
        match self {
            Self::Candlestick => TransformState::Candlestick,
            Self::HeikenAshi => TransformState::HeikenAshi(HeikenAshiState::default()),
            Self::Renko(_) => TransformState::Renko(RenkoState::default()),
        }
    }

    /// Transforms a full history.
    #[must_use]
    pub fn bulk(&self, bars: &[Bar]) -> (Vec<ChartPoint>, TransformState) {
        match self {
            Self::Candlestick => {
                let (out, ()) = Candlestick.bulk(bars);
                (points(out), TransformState::Candlestick)
            }
            Self::HeikenAshi => {
                let (out, state) = HeikenAshi.bulk(bars);
                (points(out), TransformState::HeikenAshi(state))
            }
            Self::Renko(engine) => {
                let (out, state) = engine.bulk(bars);
                (points(out), TransformState::Renko(state))
            }
        }
    }

    /// Transforms one realtime bar.
    ///
    /// A state belonging to another chart type is discarded and the bar is
    /// processed from the initial state.
    #[must_use]
    pub fn incremental(&self, state: TransformState, bar: &Bar) -> (TransformState, Vec<ChartPoint>) {
        let state = if self.accepts(&state) {
            state
        } else {
            debug!(chart = %self.chart_type(), "resetting mismatched transform state");
            self.initial_state()
        };

        match (self, state) {
            (Self::HeikenAshi, TransformState::HeikenAshi(state)) => {
                let (next, out) = HeikenAshi.incremental(state, bar);
                (TransformState::HeikenAshi(next), points(out))
            }
            (Self::Renko(engine), TransformState::Renko(state)) => {
                let (next, out) = engine.incremental(state, bar);
                (TransformState::Renko(next), points(out))
            }
            _ => {
                let ((), out) = Candlestick.incremental((), bar);
                (TransformState::Candlestick, points(out))
            }
        }
    }

    const fn accepts(&self, state: &TransformState) -> bool {
        matches!(
            (self, state),
            (Self::Candlestick, TransformState::Candlestick)
                | (Self::HeikenAshi, TransformState::HeikenAshi(_))
                | (Self::Renko(_), TransformState::Renko(_))
        )
    }
}
