//! Renko brick representation.

use serde::{Deserialize, Serialize};

use crate::Bar;
use crate::error::InvalidDirection;

/// Tolerance used when checking brick edges against open/close.
pub const BRICK_TOLERANCE: f64 = 0.01;

/// Display color of an up brick.
pub const UP_COLOR: &str = "#26a69a";

/// Display color of a down brick.
pub const DOWN_COLOR: &str = "#ef5350";

/// Direction of a Renko brick.
///
/// Serialized as `1` (up) or `-1` (down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    /// Rising brick.
    #[default]
    Up,
    /// Falling brick.
    Down,
}

impl Direction {
    /// Returns `1` for up and `-1` for down.
    #[must_use]
    pub const fn sign(&self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// Returns the display color for this direction.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Up => UP_COLOR,
            Self::Down => DOWN_COLOR,
        }
    }

    /// Returns the direction as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.sign()
    }
}

impl TryFrom<i8> for Direction {
    type Error = InvalidDirection;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(InvalidDirection(other)),
        }
    }
}

/// A fixed-price-increment chart unit.
///
/// Up bricks have `low == open` and `high == close`; down bricks have
/// `high == open` and `low == close`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenkoBrick {
    /// Synthetic brick timestamp in seconds.
    pub time: i64,
    /// Opening edge of the brick.
    pub open: f64,
    /// Upper edge of the brick.
    pub high: f64,
    /// Lower edge of the brick.
    pub low: f64,
    /// Closing edge of the brick.
    pub close: f64,
    /// Volume of the source bar that produced the brick.
    pub volume: u64,
    /// Brick direction.
    pub direction: Direction,
}

impl RenkoBrick {
    /// Creates an up brick stacked on `open`.
    #[must_use]
    pub fn up(time: i64, open: f64, size: f64, volume: u64) -> Self {
        let close = open + size;
        Self {
            time,
            open,
            high: close,
            low: open,
            close,
            volume,
            direction: Direction::Up,
        }
    }

    /// Creates a down brick hanging from `open`.
    #[must_use]
    pub fn down(time: i64, open: f64, size: f64, volume: u64) -> Self {
        let close = open - size;
        Self {
            time,
            open,
            high: open,
            low: close,
            close,
            volume,
            direction: Direction::Down,
        }
    }

    /// Returns the display color derived from the direction.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        self.direction.color()
    }

    /// Returns true if the brick edges agree with its direction.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let finite = self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite();
        if !finite {
            return false;
        }

        match self.direction {
            Direction::Up => {
                (self.high - self.close).abs() < BRICK_TOLERANCE
                    && (self.low - self.open).abs() < BRICK_TOLERANCE
            }
            Direction::Down => {
                (self.low - self.close).abs() < BRICK_TOLERANCE
                    && (self.high - self.open).abs() < BRICK_TOLERANCE
            }
        }
    }

    /// Returns the brick as a plain bar.
    #[must_use]
    pub const fn as_bar(&self) -> Bar {
        Bar::new(
            self.time, self.open, self.high, self.low, self.close, self.volume,
        )
    }
}
