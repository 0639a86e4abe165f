//! Benchmark utilities for chartmill.
//!
//! Series are generated from a seeded random walk so every run sees the
//! same input.

use std::time::{Duration, Instant};

use chartmill_lib::{Bar, RawBar, Tick};
use chrono::{TimeZone, Utc};

/// Result of a single benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Name of the stage being benchmarked.
    pub stage: String,
    /// Wall time of the run.
    pub duration: Duration,
    /// Number of input elements processed.
    pub input_points: u64,
    /// Number of output points produced.
    pub output_points: u64,
    /// Bytes written, for output stages.
    pub output_size: u64,
}

impl BenchmarkResult {
    /// Times `run`, which returns the number of output points and bytes written.
    pub fn measure<F>(stage: &str, input_points: u64, run: F) -> Self
    where
        F: FnOnce() -> (u64, u64),
    {
        let start = Instant::now();
        let (output_points, output_size) = run();
        Self {
            stage: stage.to_string(),
            duration: start.elapsed(),
            input_points,
            output_points,
            output_size,
        }
    }

    /// Calculate input points per second.
    pub fn points_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 { self.input_points as f64 / secs } else { 0.0 }
    }
}

/// Shape of a generated price series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesConfig {
    /// First bar time in seconds.
    pub start: i64,
    /// Seconds between consecutive bars.
    pub step_secs: i64,
    /// Starting price.
    pub price: f64,
    /// Maximum absolute move per step.
    pub volatility: f64,
    /// Random walk seed.
    pub seed: u64,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            step_secs: 60,
            price: 30_000.0,
            volatility: 25.0,
            seed: 0x5eed,
        }
    }
}

/// Returns 2024-01-02 00:00:00 UTC in seconds.
pub fn default_start() -> i64 {
    Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
        .single()
        .map_or(1_704_153_600, |t| t.timestamp())
}

/// SplitMix64 generator.
#[derive(Debug, Clone)]
struct Walk {
    state: u64,
}

impl Walk {
    const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[-1, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    }
}

/// Generates `count` well-formed bars following a random walk.
pub fn synthetic_bars(count: usize, config: &SeriesConfig) -> Vec<Bar> {
    let mut walk = Walk::new(config.seed);
    let mut price = config.price;
    let mut bars = Vec::with_capacity(count);

    for i in 0..count {
        let open = price;
        let close = (open + walk.unit() * config.volatility).max(1.0);
        let high = open.max(close) + walk.unit().abs() * config.volatility / 2.0;
        let low = (open.min(close) - walk.unit().abs() * config.volatility / 2.0).max(0.5);
        let volume = 1 + walk.next_u64() % 500;
        bars.push(Bar::new(config.start + config.step_secs * i as i64, open, high, low, close, volume));
        price = close;
    }

    bars
}

/// Generates `count` ticks, several per second, following a random walk.
pub fn synthetic_ticks(count: usize, config: &SeriesConfig) -> Vec<Tick> {
    let mut walk = Walk::new(config.seed);
    let mut price = config.price;

    (0..count)
        .map(|i| {
            price = (price + walk.unit() * config.volatility / 10.0).max(1.0);
            Tick::new(price, config.start + i as i64 / 4).with_volume(1 + walk.next_u64() % 10)
        })
        .collect()
}

/// Converts bars back to raw records, as a history request would deliver them.
pub fn synthetic_records(bars: &[Bar]) -> Vec<RawBar> {
    bars.iter()
        .map(|b| RawBar::numeric(b.time, b.open, b.high, b.low, b.close, b.volume))
        .collect()
}

/// Format duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.0}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.1}ms", secs * 1000.0)
    } else {
        format!("{:.2}s", secs)
    }
}

/// Format bytes for display.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_bars_well_formed() {
        let bars = synthetic_bars(1_000, &SeriesConfig::default());
        assert_eq!(bars.len(), 1_000);
        assert!(bars.iter().all(Bar::is_well_formed));
        assert!(bars.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_synthetic_series_deterministic() {
        let config = SeriesConfig::default();
        assert_eq!(synthetic_bars(50, &config), synthetic_bars(50, &config));
        assert_eq!(synthetic_ticks(50, &config), synthetic_ticks(50, &config));
    }

    #[test]
    fn test_default_start() {
        assert_eq!(default_start(), 1_704_153_600);
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_bytes(2048), "2.0 KB");
    }
}
