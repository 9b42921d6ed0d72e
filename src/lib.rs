//! # wilson-stats
//!
//! Profile-likelihood confidence intervals for a single Wilson coefficient.
//!
//! The pipeline has three stages, each in its own crate:
//!
//! 1. [`wilson_yield`]: fit a quadratic total-yield model to the column sums of
//!    a reweighted reference sample
//! 2. [`wilson_likelihood`]: combine it with two per-event models into the extended
//!    log-likelihood ratio `LLR(c)` of an observed event set
//! 3. [`wilson_confidence`]: minimize `LLR`, then solve the profile test statistic
//!    against a chi-squared cutoff on each side of the minimum
//!
//! # Example
//!
//! ```rust
//! use wilson_stats::prelude::*;
//!
//! // Reference sums for Y(c) = 1000·(1 + c/2)²
//! let table = ReferenceWeightTable::from_sums([
//!     ("weight_sm", 1000.0),
//!     ("weight_neg1p0", 250.0),
//!     ("weight_pos1p0", 2250.0),
//!     ("weight_pos2p0", 4000.0),
//! ])
//! .unwrap();
//! let yield_model = YieldModel::fit(&table, &KeyCodec::default()).unwrap();
//!
//! // Observed events with total multiplicity Y(1)
//! let schema = FeatureSchema::new(["pt"]).unwrap();
//! let kinematics = Kinematics::new(schema, vec![30.0, 45.0, 80.0]).unwrap();
//! let events = WeightedEventSet::new(kinematics, vec![750.0, 750.0, 750.0]).unwrap();
//!
//! let surface = LikelihoodSurface::new(
//!     yield_model,
//!     RatioEstimator::new(Constant(0.5), Constant(0.0)),
//! );
//! let finder = IntervalFinder::new(IntervalConfig::default().with_initial_bracket(0.0, 2.0));
//! let ci = finder.find_interval_for(&surface, &events).unwrap();
//!
//! assert!((ci.point_estimate - 1.0).abs() < 1e-4);
//! assert!(ci.contains(1.0));
//! ```

pub use wilson_confidence;
pub use wilson_core;
pub use wilson_likelihood;
pub use wilson_yield;

pub use wilson_core::{Error, Result};

/// Commonly used items
pub mod prelude {
    pub use wilson_confidence::{
        compare_models, find_interval, report_all, BracketingRootFinder, BrentMinimizer,
        ChiSquaredCutoff, CollectingSink, ConfidenceInterval, ConfidenceLevel, CutoffStrategy,
        FixedCutoff, IntervalConfig, IntervalFinder, IntervalReport, ModelOutcome, ReportingSink,
        TestStatisticCurve, TracingSink,
    };
    pub use wilson_core::{
        per_event, Constant, Error, EventFunction, FeatureSchema, Kinematics, Linear, Result,
        Side, WeightedEventSet,
    };
    pub use wilson_likelihood::{
        BoundSurface, DegeneratePolicy, LikelihoodSurface, LogLikelihoodRatio, RatioEstimator,
    };
    pub use wilson_yield::{KeyCodec, ReferenceWeightTable, WeightKey, YieldModel};
}
