//! Criterion benchmarks for the path simulator.
//!
//! Measures shock generation and full simulation across trial counts,
//! single- and multi-asset, sequential and trial-parallel.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sim_core::history::PriceHistory;
use sim_core::returns::ReturnStatistics;
use sim_paths::shocks::ShockGenerator;
use sim_paths::{PathSimulator, ShockModel, SimRng, SimulationConfig};

/// Generate a synthetic price history with mildly correlated assets.
fn generate_history(n_assets: usize, n_rows: usize) -> PriceHistory {
    let assets = (0..n_assets).map(|a| format!("ASSET{}", a)).collect();
    let rows = (0..n_rows)
        .map(|r| {
            let common = (r as f64 * 0.37).sin() * 0.01;
            (0..n_assets)
                .map(|a| {
                    let own = ((r * (a + 3)) as f64 * 0.91).cos() * 0.008;
                    100.0 * (1.0 + a as f64 * 0.1) * (1.0 + common + own)
                })
                .collect()
        })
        .collect();
    PriceHistory::from_rows(assets, rows).expect("valid synthetic history")
}

/// Benchmark correlated shock generation.
fn bench_shock_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("shock_generation");
    let history = generate_history(5, 252);
    let stats = ReturnStatistics::from_history(&history).unwrap();
    let generator = ShockGenerator::new(&stats, ShockModel::SampleCovariance).unwrap();

    for n_trials in [1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("5_assets_30_periods", n_trials), &n_trials, |b, &n| {
            let mut rng = SimRng::from_seed(42);
            b.iter(|| generator.generate(black_box(30), black_box(n), &mut rng));
        });
    }

    group.finish();
}

/// Benchmark end-to-end simulation.
fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    group.sample_size(20);

    for n_assets in [1, 5] {
        let history = generate_history(n_assets, 252);
        for parallel in [false, true] {
            let config = SimulationConfig::builder()
                .n_periods(30)
                .n_trials(10_000)
                .parallel(parallel)
                .build()
                .unwrap();
            let simulator = PathSimulator::new(config);
            let label = if parallel { "parallel" } else { "sequential" };

            group.bench_with_input(BenchmarkId::new(label, n_assets), &history, |b, history| {
                let mut rng = SimRng::from_seed(7);
                b.iter(|| simulator.simulate(black_box(history), &mut rng).unwrap());
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_shock_generation, bench_simulate);
criterion_main!(benches);
