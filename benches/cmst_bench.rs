//! Criterion benchmarks for the CMST annealer.
//!
//! Uses random Euclidean instances so cost structure resembles the
//! usual CMST test sets.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use std::time::Duration;
use u_cmst::instance::ProblemInstance;
use u_cmst::neighbor::NeighborGenerator;
use u_cmst::random::create_rng;
use u_cmst::sa::{AnnealConfig, AnnealRunner, IterationSchedule};
use u_cmst::tree::TreeState;

// ===========================================================================
// Instances
// ===========================================================================

/// `n` clients on a 100x100 grid with the depot at the centre; costs
/// are rounded Euclidean distances.
fn euclidean_instance(n: usize, capacity: i64, seed: u64) -> ProblemInstance {
    let mut rng = create_rng(seed);
    let mut points: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
        .collect();
    points.push((50.0, 50.0));

    let costs = points
        .iter()
        .flat_map(|&(xi, yi)| {
            points
                .iter()
                .map(move |&(xj, yj)| ((xi - xj).hypot(yi - yj)).round() as i64)
        })
        .collect();
    ProblemInstance::new(n, capacity, costs).expect("valid benchmark instance")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_neighbor_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_generation");

    for &n in &[40usize, 80, 160] {
        let instance = euclidean_instance(n, 10, 42);
        let generator = NeighborGenerator::default();
        let current = TreeState::star(&instance);
        group.bench_with_input(BenchmarkId::from_parameter(n), &instance, |b, inst| {
            let mut rng = create_rng(7);
            let mut candidate = current.clone();
            b.iter(|| {
                let mv = generator
                    .generate(black_box(&current), &mut candidate, inst, &mut rng)
                    .expect("feasible move");
                black_box(mv)
            })
        });
    }
    group.finish();
}

fn bench_anneal(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal");
    group.sample_size(10);

    for &(n, capacity) in &[(40usize, 5i64), (80, 10)] {
        let instance = euclidean_instance(n, capacity, 42);
        let config = AnnealConfig::default()
            .with_initial_temperature(1_000.0)
            .with_kb(0.05)
            .with_reduction_factor(0.9)
            .with_schedule(IterationSchedule::Fixed { iterations: 1_000 })
            .with_time_budget(Duration::from_secs(60))
            .with_max_stages(20)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{n}_c{capacity}"), n),
            &(instance, config),
            |b, (inst, cfg)| {
                b.iter(|| {
                    let result = AnnealRunner::run(black_box(inst), black_box(cfg));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_neighbor_generation, bench_anneal);
criterion_main!(benches);
