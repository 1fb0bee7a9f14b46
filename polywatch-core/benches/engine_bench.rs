//! Criterion benchmarks for the engine hot paths.
//!
//! Benchmarks:
//! 1. Identity seeding
//! 2. Path synthesis at several horizons
//! 3. Metrics over a pre-built path
//! 4. Full synthesize + metrics call

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use polywatch_core::domain::Identity;
use polywatch_core::{
    synthesize_with_metrics_as_of, IdentitySeeder, PathSynthesizer, PerformanceMetrics,
};

fn end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
}

fn bench_seed(c: &mut Criterion) {
    let id = Identity::from("0x1234567890abcdef1234567890abcdef12345678");
    c.bench_function("identity_seed", |b| {
        b.iter(|| IdentitySeeder::seed(black_box(&id)))
    });
}

fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");
    let id = Identity::from("0xABC");
    for horizon in [30_usize, 180, 365, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(horizon), &horizon, |b, &h| {
            let synth = PathSynthesizer::new(h);
            b.iter(|| synth.synthesize_as_of(black_box(&id), 20_000.0, 50.0, end()))
        });
    }
    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let path = PathSynthesizer::default().synthesize_as_of(&Identity::from("0xABC"), 20_000.0, 50.0, end());
    c.bench_function("metrics_180", |b| {
        b.iter(|| {
            PerformanceMetrics::compute(
                black_box(&path.daily_returns),
                black_box(&path.series),
                path.start_balance(),
            )
        })
    });
}

fn bench_full(c: &mut Criterion) {
    let id = Identity::from("whale1");
    c.bench_function("synthesize_with_metrics_180", |b| {
        b.iter(|| synthesize_with_metrics_as_of(black_box(&id), 1_000.0, -99.0, 180, end()))
    });
}

criterion_group!(benches, bench_seed, bench_synthesis, bench_metrics, bench_full);
criterion_main!(benches);
