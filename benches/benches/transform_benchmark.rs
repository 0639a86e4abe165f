//! Transform throughput benchmarks.
//!
//! Run with: `cargo bench --package chartmill-bench`

use chartmill_bench::{SeriesConfig, synthetic_bars, synthetic_records, synthetic_ticks};
use chartmill_lib::{
    ChartPipeline, ChartType, ChartView, HeikenAshi, NullFeed, PipelineConfig, RawBar, RenkoConfig,
    RenkoEngine, Resolution, TickAccumulator, Transform, prepare_history,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn ingest_benchmark(c: &mut Criterion) {
    let config = SeriesConfig::default();
    let mut group = c.benchmark_group("ingest");

    for size in SIZES {
        let records = synthetic_records(&synthetic_bars(size, &config));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("prepare_history", size), &records, |b, records| {
            b.iter(|| prepare_history(black_box(records.clone()), Resolution::Minutes(1)));
        });
    }

    group.finish();
}

fn transform_benchmark(c: &mut Criterion) {
    let config = SeriesConfig::default();
    let renko = RenkoEngine::new(config.volatility);
    let mut group = c.benchmark_group("transform");

    for size in SIZES {
        let bars = synthetic_bars(size, &config);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("heiken_ashi", size), &bars, |b, bars| {
            b.iter(|| HeikenAshi.bulk(black_box(bars)));
        });
        group.bench_with_input(BenchmarkId::new("renko", size), &bars, |b, bars| {
            b.iter(|| renko.bulk(black_box(bars)));
        });
        group.bench_with_input(BenchmarkId::new("renko_atr", size), &bars, |b, bars| {
            b.iter(|| {
                let engine = RenkoEngine::from_config(&RenkoConfig::default().with_atr(14), bars);
                engine.bulk(black_box(bars))
            });
        });
    }

    group.finish();
}

fn tick_benchmark(c: &mut Criterion) {
    let config = SeriesConfig::default();
    let mut group = c.benchmark_group("ticks");

    for size in SIZES {
        let ticks = synthetic_ticks(size, &config);
        group.throughput(Throughput::Elements(size as u64));

        for per_bar in [10_u32, 100] {
            let accumulator = TickAccumulator::new(per_bar);
            group.bench_with_input(
                BenchmarkId::new(format!("{per_bar}T"), size),
                &ticks,
                |b, ticks| {
                    b.iter(|| accumulator.aggregate(black_box(ticks)));
                },
            );
        }
    }

    group.finish();
}

fn realtime_benchmark(c: &mut Criterion) {
    let config = SeriesConfig::default();
    let history = synthetic_records(&synthetic_bars(1_000, &config));
    let live: Vec<RawBar> = synthetic_records(
        &synthetic_bars(
            10_000,
            &SeriesConfig {
                start: config.start + 60 * 1_000,
                seed: config.seed + 1,
                ..config
            },
        ),
    );

    let mut group = c.benchmark_group("realtime");
    group.throughput(Throughput::Elements(live.len() as u64));

    for chart_type in ChartType::all() {
        group.bench_function(BenchmarkId::new("pipeline", chart_type.as_str()), |b| {
            b.iter(|| {
                let pipeline_config = PipelineConfig::default()
                    .with_renko(RenkoConfig::default().with_brick_size(config.volatility));
                let mut pipeline = ChartPipeline::new(NullFeed, pipeline_config);
                let view = ChartView::new("BENCH", Resolution::Minutes(1), *chart_type);
                let Ok(ticket) = pipeline.activate(view) else {
                    return 0;
                };
                if pipeline.load_history(ticket, history.iter().cloned()).is_err() {
                    return 0;
                }
                live.iter().map(|record| pipeline.on_realtime(record).len()).sum::<usize>()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    ingest_benchmark,
    transform_benchmark,
    tick_benchmark,
    realtime_benchmark
);
criterion_main!(benches);
