//! Timestamp uniqueness for ascending bar series.

use chartmill_types::Bar;

/// Bumps non-increasing timestamps so the series is strictly increasing.
///
/// For each bar whose time is not greater than its predecessor's, the time is
/// set to the predecessor's time plus one second. Order is never changed.
///
/// Returns the number of timestamps adjusted.
pub fn dedupe_timestamps(bars: &mut [Bar]) -> usize {
    let mut adjusted = 0;
    for i in 1..bars.len() {
        let prev = bars[i - 1].time;
        if bars[i].time <= prev {
            bars[i].time = prev.saturating_add(1);
            adjusted += 1;
        }
    }
    adjusted
}

/// Collapses runs of bars sharing a timestamp, keeping the last delivered one.
///
/// Expects the input sorted ascending by time. Returns the number of bars removed.
pub fn collapse_duplicates(bars: &mut Vec<Bar>) -> usize {
    let before = bars.len();
    bars.dedup_by(|later, kept| {
        if later.time == kept.time {
            *kept = *later;
            true
        } else {
            false
        }
    });
    before - bars.len()
}
