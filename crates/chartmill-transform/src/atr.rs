//! Average True Range estimation for Renko brick sizing.

use chartmill_types::Bar;

/// Default number of True Range samples averaged.
pub const DEFAULT_ATR_PERIOD: usize = 14;

/// ATR assumed when the history is too short to measure one.
pub const DEFAULT_ATR: f64 = 50.0;

/// Returns the True Range of each consecutive bar pair.
///
/// `TR_i = max(high_i - low_i, |high_i - close_{i-1}|, |low_i - close_{i-1}|)`.
/// Non-finite samples are skipped.
#[must_use]
pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.windows(2)
        .map(|pair| {
            let (prev, bar) = (&pair[0], &pair[1]);
            (bar.high - bar.low)
                .max((bar.high - prev.close).abs())
                .max((bar.low - prev.close).abs())
        })
        .filter(|tr| tr.is_finite())
        .collect()
}

/// Simple average of the last `period` True Range values.
///
/// Falls back to [`DEFAULT_ATR`] when fewer than `period` samples exist.
#[must_use]
pub fn average_true_range(bars: &[Bar], period: usize) -> f64 {
    let ranges = true_ranges(bars);
    if period == 0 || ranges.len() < period {
        return DEFAULT_ATR;
    }
    ranges[ranges.len() - period..].iter().sum::<f64>() / period as f64
}
