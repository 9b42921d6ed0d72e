use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Poisson;
use wilson_stats::prelude::*;

fn yield_model() -> YieldModel {
    let table = ReferenceWeightTable::from_sums([
        ("weight_sm", 1000.0),
        ("weight_neg1p0", 250.0),
        ("weight_pos1p0", 2250.0),
        ("weight_pos2p0", 4000.0),
    ])
    .unwrap();
    YieldModel::fit(&table, &KeyCodec::default()).unwrap()
}

/// Events with multiplicities around `Y(1) = 2250`
fn generate_events(n_events: usize, seed: u64) -> WeightedEventSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let schema = FeatureSchema::new(["pt", "eta"]).unwrap();
    let data = (0..n_events)
        .flat_map(|_| [rng.gen_range(20.0..200.0), rng.gen_range(-2.5..2.5)])
        .collect();
    let kinematics = Kinematics::new(schema, data).unwrap();
    let poisson = Poisson::new(2250.0 / n_events as f64).unwrap();
    let multiples = (0..n_events).map(|_| poisson.sample(&mut rng)).collect();
    WeightedEventSet::new(kinematics, multiples).unwrap()
}

fn estimator() -> RatioEstimator<Linear, Constant> {
    // Mild pt dependence around α = 0.5
    RatioEstimator::new(Linear::new(vec![1e-4, 0.0], 0.49), Constant(0.05))
}

fn bench_surface(c: &mut Criterion) {
    let mut group = c.benchmark_group("LikelihoodSurface");
    let surface = LikelihoodSurface::new(yield_model(), estimator());

    for &size in &[100, 1_000, 10_000] {
        let events = generate_events(size, 42);

        group.bench_with_input(BenchmarkId::new("direct", size), &events, |b, events| {
            b.iter(|| surface.log_likelihood_ratio(black_box(events), black_box(0.7)))
        });

        let bound = surface.bind(&events).unwrap();
        group.bench_with_input(BenchmarkId::new("bound", size), &bound, |b, bound| {
            b.iter(|| bound.log_likelihood_ratio(black_box(0.7)))
        });
    }

    group.finish();
}

fn bench_interval(c: &mut Criterion) {
    let mut group = c.benchmark_group("IntervalFinder");
    let surface = LikelihoodSurface::new(yield_model(), estimator());

    for &size in &[100, 1_000, 10_000] {
        let bound = surface.bind(&generate_events(size, 42)).unwrap();

        for parallel in [false, true] {
            let finder = IntervalFinder::new(
                IntervalConfig::default()
                    .with_initial_bracket(0.0, 2.0)
                    .with_parallel_roots(parallel),
            );
            let label = if parallel { "parallel_roots" } else { "sequential_roots" };
            group.bench_with_input(BenchmarkId::new(label, size), &bound, |b, bound| {
                b.iter(|| finder.find_interval(black_box(bound)))
            });
        }
    }

    group.finish();
}

fn bench_yield_fit(c: &mut Criterion) {
    let codec = KeyCodec::default();
    let table = ReferenceWeightTable::from_sums(
        (-10..=10).map(|i| {
            let value = i as f64 * 0.5;
            let key = if i == 0 {
                codec.standard_model_key()
            } else {
                codec.encode(value).unwrap()
            };
            (key, 1000.0 * (1.0 + 0.5 * value).powi(2))
        }),
    )
    .unwrap();

    c.bench_function("yield_model_fit_21_points", |b| {
        b.iter(|| YieldModel::fit(black_box(&table), &codec))
    });
}

criterion_group!(benches, bench_surface, bench_interval, bench_yield_fit);
criterion_main!(benches);
