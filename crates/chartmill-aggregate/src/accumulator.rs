//! Tick-count bar synthesis.

use chartmill_types::{Bar, Resolution};
use tracing::debug;

/// Seconds of silence after which the next tick starts a fresh bar.
pub const DEFAULT_STALE_GAP_SECS: i64 = 30;

/// A single trade tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Trade price.
    pub price: f64,
    /// Trade time in seconds.
    pub time: i64,
    /// Traded volume.
    pub volume: u64,
}

impl Tick {
    /// Creates a tick with a volume of one.
    #[must_use]
    pub const fn new(price: f64, time: i64) -> Self {
        Self {
            price,
            time,
            volume: 1,
        }
    }

    /// Sets the tick volume.
    #[must_use]
    pub const fn with_volume(mut self, volume: u64) -> Self {
        self.volume = volume;
        self
    }

    /// Treats a realtime bar event as a tick at its close price.
    ///
    /// A zero volume counts as one.
    #[must_use]
    pub fn from_bar(bar: &Bar) -> Self {
        Self {
            price: bar.close,
            time: bar.time,
            volume: bar.volume.max(1),
        }
    }
}

/// The bar currently being built from ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccumulatorState {
    /// First price of the bar.
    pub open: f64,
    /// Highest price so far.
    pub high: f64,
    /// Lowest price so far.
    pub low: f64,
    /// Latest price.
    pub close: f64,
    /// Summed tick volume.
    pub volume: u64,
    /// Synthetic bar time.
    pub time: i64,
    /// Ticks folded into the bar.
    pub tick_count: u32,
    /// Time of the most recent tick.
    pub last_tick_time: i64,
    /// Whether the bar has already been handed out as complete.
    pub sealed: bool,
}

impl AccumulatorState {
    /// Opens an empty bar at `price`.
    const fn open_at(time: i64, price: f64, last_tick_time: i64) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 0,
            time,
            tick_count: 0,
            last_tick_time,
            sealed: false,
        }
    }

    /// Folds one tick into the bar.
    fn update(&mut self, tick: &Tick) {
        self.high = self.high.max(tick.price);
        self.low = self.low.min(tick.price);
        self.close = tick.price;
        self.volume += tick.volume;
        self.tick_count += 1;
        self.last_tick_time = tick.time;
    }

    /// Returns the bar built so far.
    #[must_use]
    pub const fn to_bar(&self) -> Bar {
        Bar::new(
            self.time, self.open, self.high, self.low, self.close, self.volume,
        )
    }
}

/// Synthesizes fixed-tick-count bars from a tick stream.
///
/// The accumulator holds no state itself; [`TickAccumulator::push`] takes the
/// current state and returns the next one, so independent streams never share
/// anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickAccumulator {
    ticks_per_bar: u32,
    stale_gap_secs: i64,
}

impl TickAccumulator {
    /// Creates an accumulator closing a bar every `ticks_per_bar` ticks.
    ///
    /// A count of zero is treated as one, so every tick completes a bar.
    #[must_use]
    pub const fn new(ticks_per_bar: u32) -> Self {
        Self {
            ticks_per_bar: if ticks_per_bar == 0 { 1 } else { ticks_per_bar },
            stale_gap_secs: DEFAULT_STALE_GAP_SECS,
        }
    }

    /// Creates an accumulator for a tick resolution, or None for time resolutions.
    #[must_use]
    pub const fn for_resolution(resolution: Resolution) -> Option<Self> {
        match resolution.ticks_per_bar() {
            Some(ticks) => Some(Self::new(ticks)),
            None => None,
        }
    }

    /// Sets the silence after which a partial bar is closed.
    #[must_use]
    pub const fn with_stale_gap(mut self, secs: i64) -> Self {
        self.stale_gap_secs = secs;
        self
    }

    /// Returns the number of ticks per bar.
    #[must_use]
    pub const fn ticks_per_bar(&self) -> u32 {
        self.ticks_per_bar
    }

    /// Returns the stale gap in seconds.
    #[must_use]
    pub const fn stale_gap_secs(&self) -> i64 {
        self.stale_gap_secs
    }

    /// Folds one tick into the accumulator state.
    ///
    /// Returns the next state and the bar completed by this tick, if any.
    /// A bar completes as soon as it holds `ticks_per_bar` ticks; a partial
    /// bar is closed when the next tick arrives after the stale gap. Ticks
    /// with a non-finite price leave the state untouched.
    #[must_use]
    pub fn push(
        &self,
        state: Option<AccumulatorState>,
        tick: Tick,
    ) -> (Option<AccumulatorState>, Option<Bar>) {
        self.push_after(state, tick, i64::MIN)
    }

    /// Like [`push`](Self::push), but a bar opened from an empty state is
    /// stamped no earlier than `floor_time`.
    ///
    /// Used to continue a series whose last bar is already at or past the
    /// first tick's time.
    #[must_use]
    pub fn push_after(
        &self,
        state: Option<AccumulatorState>,
        tick: Tick,
        floor_time: i64,
    ) -> (Option<AccumulatorState>, Option<Bar>) {
        if !tick.price.is_finite() {
            debug!(price = tick.price, time = tick.time, "dropping non-finite tick");
            return (state, None);
        }

        let (mut acc, mut completed) = match state {
            None => (
                AccumulatorState::open_at(tick.time.max(floor_time), tick.price, tick.time),
                None,
            ),
            Some(prior) => {
                let stale = tick.time - prior.last_tick_time > self.stale_gap_secs;
                if prior.sealed || prior.tick_count >= self.ticks_per_bar {
                    let completed = (!prior.sealed).then(|| prior.to_bar());
                    let time = if stale {
                        tick.time.max(prior.time.saturating_add(1))
                    } else {
                        prior.time.saturating_add(1)
                    };
                    (AccumulatorState::open_at(time, tick.price, tick.time), completed)
                } else if stale {
                    debug!(
                        gap = tick.time - prior.last_tick_time,
                        ticks = prior.tick_count,
                        "closing partial tick bar after stale gap"
                    );
                    let time = tick.time.max(prior.time.saturating_add(1));
                    (
                        AccumulatorState::open_at(time, tick.price, tick.time),
                        Some(prior.to_bar()),
                    )
                } else {
                    (prior, None)
                }
            }
        };

        acc.update(&tick);

        if acc.tick_count >= self.ticks_per_bar {
            acc.sealed = true;
            completed = Some(acc.to_bar());
        }

        (Some(acc), completed)
    }

    /// Returns the partial bar still held by `state`, if it was never handed out.
    #[must_use]
    pub fn finish(state: Option<AccumulatorState>) -> Option<Bar> {
        state
            .filter(|acc| !acc.sealed && acc.tick_count > 0)
            .map(|acc| acc.to_bar())
    }

    /// Aggregates a whole tick sequence, including the trailing partial bar.
    #[must_use]
    pub fn aggregate(&self, ticks: &[Tick]) -> Vec<Bar> {
        let mut state = None;
        let mut bars = Vec::new();

        for tick in ticks {
            let (next, completed) = self.push(state, *tick);
            state = next;
            bars.extend(completed);
        }

        bars.extend(Self::finish(state));
        bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn feed(acc: &TickAccumulator, prices: &[f64], start: i64) -> (Option<AccumulatorState>, Vec<Bar>) {
        let mut state = None;
        let mut bars = Vec::new();
        for (i, price) in prices.iter().enumerate() {
            let (next, completed) = acc.push(state, Tick::new(*price, start + i as i64));
            state = next;
            bars.extend(completed);
        }
        (state, bars)
    }

    #[test]
    fn test_five_tick_bar() {
        let acc = TickAccumulator::new(5);
        let (_, bars) = feed(&acc, &[100.0, 101.0, 99.0, 102.0, 100.0], 1000);

        assert_eq!(bars.len(), 1);
        let bar = bars[0];
        assert_relative_eq!(bar.open, 100.0);
        assert_relative_eq!(bar.high, 102.0);
        assert_relative_eq!(bar.low, 99.0);
        assert_relative_eq!(bar.close, 100.0);
        assert_eq!(bar.volume, 5);
        assert_eq!(bar.time, 1000);
    }

    #[test]
    fn test_partial_bar_not_emitted() {
        let acc = TickAccumulator::new(5);
        let (state, bars) = feed(&acc, &[100.0, 101.0, 99.0], 1000);
        assert!(bars.is_empty());
        let state = state.unwrap();
        assert_eq!(state.tick_count, 3);
        assert_eq!(TickAccumulator::finish(Some(state)).unwrap().close, 99.0);
    }

    #[test]
    fn test_next_bar_time_continues_series() {
        let acc = TickAccumulator::new(5);
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + f64::from(i)).collect();
        // all ticks in the same second
        let mut state = None;
        let mut bars = Vec::new();
        for price in prices {
            let (next, completed) = acc.push(state, Tick::new(price, 5000));
            state = next;
            bars.extend(completed);
        }
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].time, 5000);
        assert_eq!(bars[1].time, 5001);
        assert_relative_eq!(bars[1].open, 105.0);
        assert_relative_eq!(bars[1].close, 109.0);
    }

    #[test]
    fn test_sealed_bar_not_emitted_twice() {
        let acc = TickAccumulator::new(5);
        let (state, bars) = feed(&acc, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 10);
        assert_eq!(bars.len(), 1);
        let state = state.unwrap();
        assert_eq!(state.tick_count, 1);
        assert_relative_eq!(state.open, 6.0);
        assert!(TickAccumulator::finish(Some(state)).is_some());
    }

    #[test]
    fn test_stale_gap_closes_partial_bar() {
        let acc = TickAccumulator::new(5);
        let (state, _) = feed(&acc, &[10.0, 11.0], 100);
        let (state, completed) = acc.push(state, Tick::new(12.0, 200));

        let completed = completed.unwrap();
        assert_eq!(completed.volume, 2);
        assert_relative_eq!(completed.close, 11.0);

        let state = state.unwrap();
        assert_eq!(state.time, 200);
        assert_eq!(state.tick_count, 1);
        assert_relative_eq!(state.open, 12.0);
    }

    #[test]
    fn test_gap_within_threshold_keeps_bar() {
        let acc = TickAccumulator::new(5).with_stale_gap(30);
        let (state, _) = feed(&acc, &[10.0], 100);
        let (state, completed) = acc.push(state, Tick::new(11.0, 130));
        assert!(completed.is_none());
        assert_eq!(state.unwrap().tick_count, 2);
    }

    #[test]
    fn test_non_finite_tick_ignored() {
        let acc = TickAccumulator::new(5);
        let (state, _) = feed(&acc, &[10.0, 11.0], 100);
        let (after, completed) = acc.push(state, Tick::new(f64::NAN, 102));
        assert!(completed.is_none());
        assert_eq!(after, state);

        let (after, completed) = acc.push(None, Tick::new(f64::INFINITY, 1));
        assert!(after.is_none());
        assert!(completed.is_none());
    }

    #[test]
    fn test_tick_volume() {
        let acc = TickAccumulator::new(2);
        let (state, completed) = acc.push(None, Tick::new(1.0, 1).with_volume(3));
        assert!(completed.is_none());
        let (_, completed) = acc.push(state, Tick::new(2.0, 1).with_volume(4));
        assert_eq!(completed.unwrap().volume, 7);
    }

    #[test]
    fn test_for_resolution() {
        let acc = TickAccumulator::for_resolution(Resolution::Ticks(1000)).unwrap();
        assert_eq!(acc.ticks_per_bar(), 25);
        assert!(TickAccumulator::for_resolution(Resolution::Minutes(1)).is_none());
        assert_eq!(TickAccumulator::new(0).ticks_per_bar(), 1);
    }

    #[test]
    fn test_single_tick_bars() {
        let acc = TickAccumulator::new(1);
        let ticks = [Tick::new(1.0, 10), Tick::new(2.0, 10), Tick::new(3.0, 11)];
        let bars = acc.aggregate(&ticks);
        let times: Vec<_> = bars.iter().map(|b| b.time).collect();
        assert_eq!(times, vec![10, 11, 12]);
        assert!(bars.iter().all(|b| b.volume == 1));
    }

    #[test]
    fn test_push_after_floors_first_bar() {
        let acc = TickAccumulator::new(5);
        let (state, completed) = acc.push_after(None, Tick::new(200.0, 1009), 1010);
        assert!(completed.is_none());
        assert_eq!(state.unwrap().time, 1010);

        // the floor only applies when opening from an empty state
        let (state, _) = acc.push_after(state, Tick::new(201.0, 1009), 5000);
        assert_eq!(state.unwrap().time, 1010);
        assert_eq!(state.unwrap().tick_count, 2);

        let (state, _) = acc.push_after(None, Tick::new(1.0, 3000), 1010);
        assert_eq!(state.unwrap().time, 3000);
    }

    #[test]
    fn test_aggregate() {
        let acc = TickAccumulator::new(5);
        let ticks: Vec<_> = (0..12).map(|i| Tick::new(f64::from(i), 50)).collect();
        let bars = acc.aggregate(&ticks);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[2].volume, 2);
        let times: Vec<_> = bars.iter().map(|b| b.time).collect();
        assert_eq!(times, vec![50, 51, 52]);
    }

    #[test]
    fn test_tick_from_bar() {
        let tick = Tick::from_bar(&Bar::new(9, 1.0, 2.0, 0.5, 1.5, 0));
        assert_eq!(tick.volume, 1);
        assert_relative_eq!(tick.price, 1.5);
        assert_eq!(tick.time, 9);
    }
}
