//! Benchmark runner that outputs a markdown table for the README.
//!
//! Run with: `cargo run --package chartmill-bench --bin benchmark_table --release`

use std::fs::File;
use std::io::{BufWriter, Write};

use chartmill_bench::{
    BenchmarkResult, SeriesConfig, format_bytes, format_duration, synthetic_bars,
    synthetic_records, synthetic_ticks,
};
use chartmill_lib::{
    ChartPoint, CsvFormatter, Formatter, HeikenAshi, RenkoEngine, Resolution, TickAccumulator,
    Transform, prepare_history,
};

/// Number of iterations per benchmark for statistical significance.
const ITERATIONS: usize = 5;

/// Bars per generated series.
const SERIES_LEN: usize = 100_000;

fn main() -> std::io::Result<()> {
    println!("chartmill transform benchmark");
    println!("=============================\n");
    println!("Running benchmarks ({ITERATIONS} iterations, {SERIES_LEN} points each)...\n");

    let config = SeriesConfig::default();
    let bars = synthetic_bars(SERIES_LEN, &config);
    let records = synthetic_records(&bars);
    let ticks = synthetic_ticks(SERIES_LEN, &config);
    let renko = RenkoEngine::new(config.volatility);
    let accumulator = TickAccumulator::new(100);
    let input = SERIES_LEN as u64;
    let temp_dir = tempfile::TempDir::new()?;

    let mut results: Vec<Vec<BenchmarkResult>> = Vec::new();

    for _ in 0..ITERATIONS {
        let output = temp_dir.path().join("series.csv");
        let run = vec![
            BenchmarkResult::measure("ingest", input, || {
                let report = prepare_history(records.clone(), Resolution::Minutes(1));
                (report.bars.len() as u64, 0)
            }),
            BenchmarkResult::measure("heiken-ashi", input, || {
                (HeikenAshi.bulk(&bars).0.len() as u64, 0)
            }),
            BenchmarkResult::measure("renko", input, || (renko.bulk(&bars).0.len() as u64, 0)),
            BenchmarkResult::measure("100T ticks", input, || {
                (accumulator.aggregate(&ticks).len() as u64, 0)
            }),
            BenchmarkResult::measure("csv output", input, || {
                let points: Vec<ChartPoint> = bars.iter().copied().map(ChartPoint::from).collect();
                write_csv(&points, &output).map_or((0, 0), |size| (points.len() as u64, size))
            }),
        ];
        results.push(run);
        print!(".");
        std::io::stdout().flush()?;
    }
    println!(" done");

    println!("\n## Results\n");
    println!("| Stage | Time | Output Points | Throughput |");
    println!("|-------|------|---------------|------------|");

    let Some(first) = results.first() else {
        return Ok(());
    };
    for (index, sample) in first.iter().enumerate() {
        let runs: Vec<&BenchmarkResult> = results.iter().filter_map(|run| run.get(index)).collect();
        let avg = average_results(&runs);
        let size = if avg.output_size > 0 {
            format!(" ({})", format_bytes(avg.output_size))
        } else {
            String::new()
        };
        println!(
            "| {} | {} | {}{} | {:.1}M/s |",
            sample.stage,
            format_duration(avg.duration),
            avg.output_points,
            size,
            avg.points_per_sec() / 1_000_000.0
        );
    }

    println!("\n### Environment\n");
    println!("- OS: {}", std::env::consts::OS);
    println!("- Arch: {}", std::env::consts::ARCH);
    println!("- chartmill version: {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn write_csv(points: &[ChartPoint], path: &std::path::Path) -> Option<u64> {
    let file = File::create(path).ok()?;
    CsvFormatter::new().write_series(points, BufWriter::new(file)).ok()?;
    std::fs::metadata(path).map(|m| m.len()).ok()
}

fn average_results(results: &[&BenchmarkResult]) -> BenchmarkResult {
    let count = results.len().max(1) as u32;
    let mut avg = results.first().map_or_else(
        || BenchmarkResult::measure("", 0, || (0, 0)),
        |r| (*r).clone(),
    );
    avg.duration = results.iter().map(|r| r.duration).sum::<std::time::Duration>() / count;
    avg
}
