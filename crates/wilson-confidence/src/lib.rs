//! Profile-likelihood confidence intervals for a Wilson coefficient
//!
//! Given any LLR surface (a [`BoundSurface`](wilson_likelihood::BoundSurface)
//! or a plain closure), [`IntervalFinder`] locates the minimum and solves
//! `T(c) = cutoff` on both sides of it:
//!
//! - **Cutoffs**: chi-squared quantiles via [`ChiSquaredCutoff`], or a
//!   [`FixedCutoff`]
//! - **Minimization**: bracket expansion plus argmin's Brent optimizer in
//!   [`BrentMinimizer`]
//! - **Roots**: per-side bracketing plus argmin's Brent-Dekker in
//!   [`BracketingRootFinder`], run concurrently with the `parallel` feature
//! - **Reports**: [`IntervalReport`] with a sampled [`TestStatisticCurve`],
//!   delivered through a [`ReportingSink`]
//!
//! # Example
//!
//! ```rust
//! use wilson_confidence::{IntervalConfig, IntervalFinder};
//! use wilson_core::Result;
//!
//! // LLR(c) = 2·(c − 1)², so T(c) = 4·(c − 1)²
//! let surface = |c: f64| -> Result<f64> { Ok(2.0 * (c - 1.0) * (c - 1.0)) };
//!
//! let finder = IntervalFinder::new(IntervalConfig::default().with_confidence_level(0.95));
//! let ci = finder.find_interval(&surface).unwrap();
//! assert!(ci.contains(1.0));
//! println!("{}", ci);
//! ```

pub mod comparison;
pub mod config;
pub mod cutoff;
pub mod finder;
pub mod minimize;
pub mod report;
pub mod roots;
mod solver;
mod types;

pub use comparison::{compare_models, report_all, ModelOutcome};
pub use config::IntervalConfig;
pub use cutoff::{ChiSquaredCutoff, CutoffStrategy, FixedCutoff};
pub use finder::{find_interval, test_statistic, IntervalFinder};
pub use minimize::{BrentMinimizer, MinimizeResult, ScalarMinimizer};
pub use report::{CollectingSink, IntervalReport, ReportingSink, TracingSink};
pub use roots::{BracketingRootFinder, RootFinder, RootResult};
pub use types::{ConfidenceInterval, ConfidenceLevel, TestStatisticCurve};
