//! Heiken-Ashi candle smoothing.

use chartmill_types::Bar;
use tracing::debug;

use crate::transformer::Transform;

/// Running state of the Heiken-Ashi recursion.
///
/// `previous` is the candle that preceded `last`. It is kept so that a revision
/// of the most recent raw bar can recompute `last` from the same predecessor a
/// bulk pass would have used.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeikenAshiState {
    /// Most recent candle produced.
    pub last: Option<Bar>,
    /// Candle preceding `last`.
    pub previous: Option<Bar>,
}

impl HeikenAshiState {
    const fn advance(self, candle: Bar) -> Self {
        Self {
            last: Some(candle),
            previous: self.last,
        }
    }
}

/// Computes one Heiken-Ashi candle from a raw bar and the prior candle.
///
/// ```text
/// close = (open + high + low + close) / 4
/// open  = (prev.open + prev.close) / 2, or (open + close) / 2 for the first bar
/// high  = max(high, open', close')
/// low   = min(low, open', close')
/// ```
#[must_use]
pub fn heiken_ashi_candle(bar: &Bar, prev: Option<&Bar>) -> Bar {
    let close = bar.ohlc4();
    let open = prev.map_or_else(
        || (bar.open + bar.close) / 2.0,
        |prev| (prev.open + prev.close) / 2.0,
    );
    Bar::new(
        bar.time,
        open,
        bar.high.max(open).max(close),
        bar.low.min(open).min(close),
        close,
        bar.volume,
    )
}

/// Heiken-Ashi transform.
///
/// Candles failing the bar invariants are dropped and do not become the
/// predecessor of the next candle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeikenAshi;

impl Transform for HeikenAshi {
    type State = HeikenAshiState;
    type Output = Bar;

    fn bulk(&self, bars: &[Bar]) -> (Vec<Bar>, HeikenAshiState) {
        let mut state = HeikenAshiState::default();
        let mut candles = Vec::with_capacity(bars.len());

        for bar in bars {
            let candle = heiken_ashi_candle(bar, state.last.as_ref());
            if candle.is_well_formed() {
                candles.push(candle);
                state = state.advance(candle);
            } else {
                debug!(time = bar.time, "dropping invalid heiken-ashi candle");
            }
        }

        (candles, state)
    }

    fn incremental(&self, state: HeikenAshiState, bar: &Bar) -> (HeikenAshiState, Vec<Bar>) {
        let revising = match state.last {
            Some(last) if bar.time < last.time => {
                debug!(time = bar.time, last = last.time, "ignoring stale heiken-ashi update");
                return (state, Vec::new());
            }
            Some(last) => bar.time == last.time,
            None => false,
        };

        let prev = if revising { state.previous } else { state.last };
        let candle = heiken_ashi_candle(bar, prev.as_ref());
        if !candle.is_well_formed() {
            debug!(time = bar.time, "dropping invalid heiken-ashi candle");
            return (state, Vec::new());
        }

        let next = if revising {
            HeikenAshiState {
                last: Some(candle),
                previous: state.previous,
            }
        } else {
            state.advance(candle)
        };
        (next, vec![candle])
    }
}
