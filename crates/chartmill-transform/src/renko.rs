//! Renko brick construction.

use chartmill_types::{Bar, Direction, RenkoBrick};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::atr::{DEFAULT_ATR_PERIOD, average_true_range};
use crate::transformer::Transform;

/// Brick size used when the configured or estimated size is unusable.
pub const FALLBACK_BRICK_SIZE: f64 = 10.0;

/// Renko brick sizing options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenkoConfig {
    /// Fixed brick size. Ignored when `use_atr` is set.
    pub brick_size: Option<f64>,
    /// Derive the brick size from the Average True Range of the history.
    pub use_atr: bool,
    /// Number of True Range samples averaged.
    pub atr_period: usize,
}

impl Default for RenkoConfig {
    fn default() -> Self {
        Self {
            brick_size: None,
            use_atr: false,
            atr_period: DEFAULT_ATR_PERIOD,
        }
    }
}

impl RenkoConfig {
    /// Uses a fixed brick size.
    #[must_use]
    pub const fn with_brick_size(mut self, size: f64) -> Self {
        self.brick_size = Some(size);
        self.use_atr = false;
        self
    }

    /// Derives the brick size from the ATR over `period` samples.
    #[must_use]
    pub const fn with_atr(mut self, period: usize) -> Self {
        self.use_atr = true;
        self.atr_period = period;
        self
    }

    /// Resolves the brick size for a history.
    ///
    /// A fixed size wins unless ATR sizing is requested; without a fixed
    /// size the ATR is used. ATR sizes are `max(1, round(ATR / 2))`.
    #[must_use]
    pub fn resolve_brick_size(&self, history: &[Bar]) -> f64 {
        let size = match self.brick_size {
            Some(size) if !self.use_atr => size,
            _ => {
                let atr = average_true_range(history, self.atr_period);
                let size = (0.5 * atr).round().max(1.0);
                debug!(atr, size, period = self.atr_period, "derived renko brick size");
                size
            }
        };
        usable_size(size)
    }
}

fn usable_size(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        warn!(size, fallback = FALLBACK_BRICK_SIZE, "unusable renko brick size");
        FALLBACK_BRICK_SIZE
    }
}

/// Incremental Renko state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenkoState {
    /// Upper edge of the last brick.
    pub last_brick_high: Option<f64>,
    /// Lower edge of the last brick.
    pub last_brick_low: Option<f64>,
    /// Direction of the last brick.
    pub direction: Direction,
    /// Time of the last display point.
    pub last_timestamp: Option<i64>,
}

impl RenkoState {
    /// Seeds both brick edges at `price`.
    #[must_use]
    pub const fn seeded(price: f64, last_timestamp: Option<i64>) -> Self {
        Self {
            last_brick_high: Some(price),
            last_brick_low: Some(price),
            direction: Direction::Up,
            last_timestamp,
        }
    }

    /// Returns true once the brick edges are known.
    #[must_use]
    pub const fn is_seeded(&self) -> bool {
        self.last_brick_high.is_some() && self.last_brick_low.is_some()
    }
}

/// Working brick edges while stacking.
struct Stack {
    high: f64,
    low: f64,
    direction: Direction,
}

/// Builds fixed-size Renko bricks from bar closes.
///
/// Up bricks stack on the last high, down bricks hang from the last low, and
/// nothing is emitted until the price clears an edge by a full brick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenkoEngine {
    brick_size: f64,
}

impl RenkoEngine {
    /// Creates an engine with a fixed brick size.
    ///
    /// Non-finite or non-positive sizes fall back to [`FALLBACK_BRICK_SIZE`].
    #[must_use]
    pub fn new(brick_size: f64) -> Self {
        Self {
            brick_size: usable_size(brick_size),
        }
    }

    /// Creates an engine sized by `config` against `history`.
    #[must_use]
    pub fn from_config(config: &RenkoConfig, history: &[Bar]) -> Self {
        Self {
            brick_size: config.resolve_brick_size(history),
        }
    }

    /// Returns the brick size.
    #[must_use]
    pub const fn brick_size(&self) -> f64 {
        self.brick_size
    }

    fn stack(
        &self,
        stack: &mut Stack,
        price: f64,
        volume: u64,
        mut next_time: impl FnMut() -> i64,
        out: &mut Vec<RenkoBrick>,
    ) {
        if !price.is_finite() {
            return;
        }
        let size = self.brick_size;

        // edges stop moving once the size is below float resolution
        while price >= stack.high + size && stack.high + size > stack.high {
            let brick = RenkoBrick::up(next_time(), stack.high, size, volume);
            stack.low = brick.open;
            stack.high = brick.close;
            stack.direction = Direction::Up;
            out.push(brick);
        }

        while price <= stack.low - size && stack.low - size < stack.low {
            let brick = RenkoBrick::down(next_time(), stack.low, size, volume);
            stack.high = brick.open;
            stack.low = brick.close;
            stack.direction = Direction::Down;
            out.push(brick);
        }
    }

    /// Builds the brick series for a whole history.
    ///
    /// Edges are seeded at the first close. Bricks produced by the bar at
    /// time `t` are stamped `t + k`, where `k` counts every brick emitted so
    /// far. Inconsistent bricks are dropped and any remaining non-increasing
    /// time is bumped to its predecessor plus one.
    #[must_use]
    pub fn bricks(&self, bars: &[Bar]) -> Vec<RenkoBrick> {
        let Some((first, rest)) = bars.split_first() else {
            return Vec::new();
        };

        let mut stack = Stack {
            high: first.close,
            low: first.close,
            direction: Direction::Up,
        };
        let mut bricks = Vec::new();
        let mut emitted = 0_i64;

        for bar in rest {
            self.stack(
                &mut stack,
                bar.close,
                bar.volume,
                || {
                    let time = bar.time.saturating_add(emitted);
                    emitted += 1;
                    time
                },
                &mut bricks,
            );
        }

        retain_consistent(&mut bricks);
        for i in 1..bricks.len() {
            let prev = bricks[i - 1].time;
            if bricks[i].time <= prev {
                bricks[i].time = prev.saturating_add(1);
            }
        }
        bricks
    }

    /// Folds one realtime bar into the brick state.
    ///
    /// An unseeded state is seeded at the bar close and emits nothing. New
    /// bricks are stamped from `max(last_timestamp + 1, bar.time)` upwards.
    #[must_use]
    pub fn step(&self, state: RenkoState, bar: &Bar) -> (RenkoState, Vec<RenkoBrick>) {
        let (Some(high), Some(low)) = (state.last_brick_high, state.last_brick_low) else {
            if !bar.close.is_finite() {
                return (state, Vec::new());
            }
            return (RenkoState::seeded(bar.close, state.last_timestamp), Vec::new());
        };

        let mut next = state
            .last_timestamp
            .map_or(bar.time, |last| last.saturating_add(1).max(bar.time));
        let mut stack = Stack {
            high,
            low,
            direction: state.direction,
        };
        let mut bricks = Vec::new();
        self.stack(
            &mut stack,
            bar.close,
            bar.volume,
            || {
                let time = next;
                next = next.saturating_add(1);
                time
            },
            &mut bricks,
        );

        let last_timestamp = bricks.last().map(|b| b.time).or(state.last_timestamp);
        retain_consistent(&mut bricks);

        let next_state = RenkoState {
            last_brick_high: Some(stack.high),
            last_brick_low: Some(stack.low),
            direction: stack.direction,
            last_timestamp,
        };
        (next_state, bricks)
    }
}

fn retain_consistent(bricks: &mut Vec<RenkoBrick>) {
    let before = bricks.len();
    bricks.retain(RenkoBrick::is_consistent);
    let dropped = before - bricks.len();
    if dropped > 0 {
        debug!(dropped, "dropping inconsistent renko bricks");
    }
}

impl Transform for RenkoEngine {
    type State = RenkoState;
    type Output = RenkoBrick;

    /// Builds the bricks and seeds the state from the last raw close.
    fn bulk(&self, bars: &[Bar]) -> (Vec<RenkoBrick>, RenkoState) {
        let bricks = self.bricks(bars);
        let state = bars.last().map_or_else(RenkoState::default, |last| {
            let last_timestamp = bricks
                .last()
                .map_or(last.time, |brick| brick.time.max(last.time));
            RenkoState::seeded(last.close, Some(last_timestamp))
        });
        (bricks, state)
    }

    fn incremental(&self, state: RenkoState, bar: &Bar) -> (RenkoState, Vec<RenkoBrick>) {
        self.step(state, bar)
    }
}
