//! Synthetic reference samples and event sets

#![allow(dead_code)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Poisson;
use wilson_stats::prelude::*;

/// Standard-model yield of the reference sample
pub const SM_YIELD: f64 = 1000.0;
/// Constant linear response of every event
pub const ALPHA: f64 = 0.5;
/// Coefficient the observed events are generated at
pub const TRUE_COEFFICIENT: f64 = 1.0;

pub const REFERENCE_EVENTS: usize = 200;
pub const OBSERVED_EVENTS: usize = 50;

/// `Y(c) = SM_YIELD · (1 + α·c)²`
pub fn expected_yield(coefficient: f64) -> f64 {
    let u = 1.0 + ALPHA * coefficient;
    SM_YIELD * u * u
}

/// Coefficient at which the LLR is minimal for a total multiplicity
pub fn analytic_estimate(total_multiplicity: f64) -> f64 {
    ((total_multiplicity / SM_YIELD).sqrt() - 1.0) / ALPHA
}

pub fn schema() -> FeatureSchema {
    FeatureSchema::new(["pt", "eta"]).unwrap()
}

fn kinematics(rng: &mut ChaCha8Rng, n_events: usize) -> Kinematics {
    let data = (0..n_events)
        .flat_map(|_| [rng.gen_range(20.0..200.0), rng.gen_range(-2.5..2.5)])
        .collect();
    Kinematics::new(schema(), data).unwrap()
}

/// Per-event weight columns of a reference sample, reweighted to a few
/// coefficient values, plus one kinematic column
pub fn reference_columns(seed: u64) -> Vec<(String, Vec<f64>)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let raw: Vec<f64> = (0..REFERENCE_EVENTS).map(|_| rng.gen_range(0.5..1.5)).collect();
    let norm = SM_YIELD / raw.iter().sum::<f64>();
    let sm: Vec<f64> = raw.iter().map(|w| w * norm).collect();

    let codec = KeyCodec::default();
    let mut columns = vec![
        ("pt".to_string(), (0..REFERENCE_EVENTS).map(|i| i as f64).collect()),
        (codec.standard_model_key(), sm.clone()),
    ];
    for c in [-2.0, -1.0, 1.0, 2.0] {
        let u = 1.0 + ALPHA * c;
        let name = codec.encode(c).unwrap().replacen("weight_", "weight_cHW_", 1);
        columns.push((name, sm.iter().map(|w| w * u * u).collect()));
    }
    columns
}

pub fn reference_table(seed: u64) -> ReferenceWeightTable {
    let columns = reference_columns(seed);
    ReferenceWeightTable::from_event_columns(
        &KeyCodec::default(),
        columns.iter().map(|(name, w)| (name.as_str(), w.as_slice())),
    )
    .unwrap()
}

pub fn yield_model() -> YieldModel {
    YieldModel::fit(&reference_table(7), &KeyCodec::default()).unwrap()
}

/// Events whose multiplicities sum exactly to `Y(TRUE_COEFFICIENT)`
pub fn asimov_events(seed: u64) -> WeightedEventSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let kinematics = kinematics(&mut rng, OBSERVED_EVENTS);
    let per_event = expected_yield(TRUE_COEFFICIENT) / OBSERVED_EVENTS as f64;
    WeightedEventSet::new(kinematics, vec![per_event; OBSERVED_EVENTS]).unwrap()
}

/// Events with Poisson multiplicities around `Y(TRUE_COEFFICIENT)`
pub fn poisson_events(seed: u64) -> WeightedEventSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let kinematics = kinematics(&mut rng, OBSERVED_EVENTS);
    let mean = expected_yield(TRUE_COEFFICIENT) / OBSERVED_EVENTS as f64;
    let poisson = Poisson::new(mean).unwrap();
    let multiples = (0..OBSERVED_EVENTS).map(|_| poisson.sample(&mut rng)).collect();
    WeightedEventSet::new(kinematics, multiples).unwrap()
}

pub fn estimator() -> RatioEstimator<Constant, Constant> {
    RatioEstimator::new(Constant(ALPHA), Constant(0.0))
}

pub fn surface() -> LikelihoodSurface<Constant, Constant> {
    LikelihoodSurface::new(yield_model(), estimator())
}

/// Bracket that excludes the mirror minimum at `−2/α − c`
pub fn finder(level: f64) -> IntervalFinder {
    IntervalFinder::new(
        IntervalConfig::default()
            .with_confidence_level(level)
            .with_initial_bracket(0.0, 2.0),
    )
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
