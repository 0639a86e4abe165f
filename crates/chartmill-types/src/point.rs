//! Display series points.

use serde::{Deserialize, Serialize};

use crate::{Bar, Direction, RenkoBrick};

/// Anything that carries a series timestamp.
pub trait Timestamped {
    /// Returns the timestamp in whole seconds.
    fn time(&self) -> i64;
}

impl Timestamped for Bar {
    fn time(&self) -> i64 {
        self.time
    }
}

impl Timestamped for RenkoBrick {
    fn time(&self) -> i64 {
        self.time
    }
}

/// One point of a display series: a candle or a Renko brick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartPoint {
    /// A plain or Heiken-Ashi candle.
    Candle(Bar),
    /// A Renko brick.
    Brick(RenkoBrick),
}

impl ChartPoint {
    /// Returns the OHLCV values of the point.
    #[must_use]
    pub const fn as_bar(&self) -> Bar {
        match self {
            Self::Candle(bar) => *bar,
            Self::Brick(brick) => brick.as_bar(),
        }
    }

    /// Returns the brick direction, if the point is a brick.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        match self {
            Self::Candle(_) => None,
            Self::Brick(brick) => Some(brick.direction),
        }
    }
}

impl Timestamped for ChartPoint {
    fn time(&self) -> i64 {
        match self {
            Self::Candle(bar) => bar.time,
            Self::Brick(brick) => brick.time,
        }
    }
}

impl From<Bar> for ChartPoint {
    fn from(bar: Bar) -> Self {
        Self::Candle(bar)
    }
}

impl From<RenkoBrick> for ChartPoint {
    fn from(brick: RenkoBrick) -> Self {
        Self::Brick(brick)
    }
}
