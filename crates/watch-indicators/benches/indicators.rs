//! Benchmarks for indicator implementations.

use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use watch_core::traits::SeriesIndicator;
use watch_core::types::DailySeries;
use watch_indicators::{MarketSummarizer, Rsi, Sma};

fn generate_test_series(size: u64) -> (DailySeries, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    let series = DailySeries::from_closes(
        "BENCH",
        (0..size)
            .filter(|i| i % 7 < 5)
            .map(|i| {
                let date = start.checked_add_days(Days::new(i)).unwrap();
                (date, 100.0 + (i as f64 * 0.1).sin() * 10.0)
            }),
    );
    let last = series.last_date().unwrap();
    (series, last)
}

fn benchmark_sma(c: &mut Criterion) {
    let mut group = c.benchmark_group("SMA");

    for period in [14, 50, 200].iter() {
        let (series, anchor) = generate_test_series(10_000);

        group.bench_with_input(BenchmarkId::new("anchored", period), &series, |b, series| {
            let sma = Sma::new(*period);
            b.iter(|| sma.compute(black_box(series), black_box(anchor)))
        });
    }

    group.finish();
}

fn benchmark_rsi(c: &mut Criterion) {
    let mut group = c.benchmark_group("RSI");

    for period in [14, 50, 200].iter() {
        let (series, anchor) = generate_test_series(10_000);

        group.bench_with_input(BenchmarkId::new("anchored", period), &series, |b, series| {
            let rsi = Rsi::new(*period);
            b.iter(|| rsi.compute(black_box(series), black_box(anchor)))
        });
    }

    group.finish();
}

fn benchmark_summary(c: &mut Criterion) {
    // full history, as returned by the provider with outputsize=full
    let (series, anchor) = generate_test_series(9_000);
    let summarizer = MarketSummarizer::default();

    c.bench_function("summary/full_history", |b| {
        b.iter(|| summarizer.summarize(black_box(&series), black_box(anchor)))
    });
}

criterion_group!(benches, benchmark_sma, benchmark_rsi, benchmark_summary);
criterion_main!(benches);
