//! Profile-likelihood interval search
//!
//! 1. Cutoff: chi-squared quantile at the requested level.
//! 2. Minimize `LLR(c)`, giving the point estimate `ĉ` and `m = LLR(ĉ)`.
//! 3. Test statistic `T(c) = 2·(LLR(c) − m)`, zero at `ĉ`.
//! 4. Solve `T(c) = cutoff` below and above `ĉ`.

use crate::config::IntervalConfig;
use crate::cutoff::{ChiSquaredCutoff, CutoffStrategy};
use crate::minimize::{BrentMinimizer, ScalarMinimizer};
use crate::report::IntervalReport;
use crate::roots::{BracketingRootFinder, RootFinder, RootResult};
use crate::types::{ConfidenceInterval, ConfidenceLevel, TestStatisticCurve};
use tracing::{debug, instrument};
use wilson_core::{Error, EventFunction, Result, Side, WeightedEventSet};
use wilson_likelihood::{DegeneratePolicy, LikelihoodSurface, LogLikelihoodRatio};

/// Finds confidence intervals on LLR surfaces
#[derive(Debug, Clone)]
pub struct IntervalFinder<C = ChiSquaredCutoff, M = BrentMinimizer, R = BracketingRootFinder> {
    config: IntervalConfig,
    cutoff: C,
    minimizer: M,
    root_finder: R,
}

impl IntervalFinder {
    /// Chi-squared cutoff, Brent minimizer and bracketing root finder, all
    /// tuned from `config`
    pub fn new(config: IntervalConfig) -> Self {
        let cutoff = ChiSquaredCutoff::new(config.degrees_of_freedom);
        let minimizer = BrentMinimizer::new(config.tolerance)
            .with_max_iterations(config.max_iterations)
            .with_max_bracket_expansions(config.max_bracket_expansions);
        let root_finder = BracketingRootFinder::new(config.tolerance)
            .with_max_iterations(config.max_iterations)
            .with_max_expansions(config.max_bracket_expansions);
        Self {
            config,
            cutoff,
            minimizer,
            root_finder,
        }
    }
}

impl Default for IntervalFinder {
    fn default() -> Self {
        Self::new(IntervalConfig::default())
    }
}

impl<C, M, R> IntervalFinder<C, M, R>
where
    C: CutoffStrategy,
    M: ScalarMinimizer,
    R: RootFinder,
{
    pub fn with_strategies(config: IntervalConfig, cutoff: C, minimizer: M, root_finder: R) -> Self {
        Self {
            config,
            cutoff,
            minimizer,
            root_finder,
        }
    }

    pub fn config(&self) -> &IntervalConfig {
        &self.config
    }

    /// Same strategies, different confidence level
    pub fn at_level(&self, level: f64) -> Self
    where
        C: Clone,
        M: Clone,
        R: Clone,
    {
        Self {
            config: self.config.with_confidence_level(level),
            cutoff: self.cutoff.clone(),
            minimizer: self.minimizer.clone(),
            root_finder: self.root_finder.clone(),
        }
    }

    /// Test-statistic threshold for the configured level
    pub fn cutoff(&self) -> Result<f64> {
        let level = ConfidenceLevel::new(self.config.confidence_level)?;
        self.cutoff.cutoff(level)
    }

    #[instrument(skip(self, surface), fields(confidence_level = self.config.confidence_level))]
    pub fn find_interval<S>(&self, surface: &S) -> Result<ConfidenceInterval>
    where
        S: LogLikelihoodRatio + ?Sized,
    {
        self.solve(surface).map(|(interval, _)| interval)
    }

    /// Bind `events` to `surface` and find the interval
    ///
    /// Vanishing ratios are rejected when either the configuration or the
    /// surface asks for [`DegeneratePolicy::Reject`].
    pub fn find_interval_for<A, B>(
        &self,
        surface: &LikelihoodSurface<A, B>,
        events: &WeightedEventSet,
    ) -> Result<ConfidenceInterval>
    where
        A: EventFunction,
        B: EventFunction,
    {
        let policy = stricter(self.config.degenerate_policy, surface.policy());
        let bound = surface.bind_with_policy(events, policy)?;
        self.find_interval(&bound)
    }

    /// Interval plus the test statistic sampled around it
    #[instrument(skip(self, surface), fields(confidence_level = self.config.confidence_level))]
    pub fn report<S>(&self, surface: &S) -> Result<IntervalReport>
    where
        S: LogLikelihoodRatio + ?Sized,
    {
        let (interval, cutoff) = self.solve(surface)?;
        let margin = self.config.curve_margin;
        let curve = TestStatisticCurve::sample(
            |c| test_statistic(surface, interval.min_llr, c),
            interval.lower - margin,
            interval.upper + margin,
            self.config.curve_points,
        )?;
        Ok(IntervalReport {
            interval,
            confidence_level: self.config.confidence_level,
            cutoff,
            curve,
        })
    }

    fn solve<S>(&self, surface: &S) -> Result<(ConfidenceInterval, f64)>
    where
        S: LogLikelihoodRatio + ?Sized,
    {
        let level = ConfidenceLevel::new(self.config.confidence_level)?;
        self.config.validate()?;
        let cutoff = self.cutoff.cutoff(level)?;

        let minimum = self
            .minimizer
            .minimize(|c| surface.log_likelihood_ratio(c), self.config.initial_bracket)?;
        let (estimate, min_llr) = (minimum.x, minimum.fun);
        if !estimate.is_finite() || !min_llr.is_finite() {
            return Err(Error::OptimizationDiverged {
                iterations: minimum.iterations,
                reason: format!("non-finite minimum LLR({estimate}) = {min_llr}"),
            });
        }
        debug!(
            estimate,
            min_llr,
            cutoff,
            evaluations = minimum.evaluations,
            "Located LLR minimum"
        );

        let (lower, upper) = self.run_sides(surface, estimate, min_llr, cutoff);
        let (lower, upper) = (lower?.root, upper?.root);

        if !(lower <= estimate && estimate <= upper) {
            return Err(Error::IntervalInconsistent {
                lower,
                estimate,
                upper,
            });
        }
        debug!(lower, upper, "Interval found");

        Ok((
            ConfidenceInterval::new(lower, upper, estimate, min_llr, level.value()),
            cutoff,
        ))
    }

    fn run_sides<S>(
        &self,
        surface: &S,
        estimate: f64,
        min_llr: f64,
        cutoff: f64,
    ) -> (Result<RootResult>, Result<RootResult>)
    where
        S: LogLikelihoodRatio + ?Sized,
    {
        let lower = || self.solve_side(surface, estimate, min_llr, cutoff, Side::Lower);
        let upper = || self.solve_side(surface, estimate, min_llr, cutoff, Side::Upper);

        #[cfg(feature = "parallel")]
        {
            if self.config.parallel_roots {
                return rayon::join(lower, upper);
            }
        }
        (lower(), upper())
    }

    fn solve_side<S>(
        &self,
        surface: &S,
        estimate: f64,
        min_llr: f64,
        cutoff: f64,
        side: Side,
    ) -> Result<RootResult>
    where
        S: LogLikelihoodRatio + ?Sized,
    {
        let guess = match side {
            Side::Lower => estimate - self.config.root_offset,
            Side::Upper => estimate + self.config.root_offset,
        };
        self.root_finder.find_root(
            |c| Ok(test_statistic(surface, min_llr, c)? - cutoff),
            estimate,
            guess,
            side,
        )
    }
}

fn stricter(a: DegeneratePolicy, b: DegeneratePolicy) -> DegeneratePolicy {
    if a == DegeneratePolicy::Reject || b == DegeneratePolicy::Reject {
        DegeneratePolicy::Reject
    } else {
        DegeneratePolicy::Propagate
    }
}

/// `T(c) = −2·(min_llr − LLR(c))`
pub fn test_statistic<S>(surface: &S, min_llr: f64, coefficient: f64) -> Result<f64>
where
    S: LogLikelihoodRatio + ?Sized,
{
    Ok(-2.0 * (min_llr - surface.log_likelihood_ratio(coefficient)?))
}

/// One-shot interval for `events` on `surface`
pub fn find_interval<A, B>(
    surface: &LikelihoodSurface<A, B>,
    events: &WeightedEventSet,
    confidence_level: f64,
    initial_bracket: (f64, f64),
    tolerance: f64,
) -> Result<ConfidenceInterval>
where
    A: EventFunction,
    B: EventFunction,
{
    let config = IntervalConfig::default()
        .with_confidence_level(confidence_level)
        .with_initial_bracket(initial_bracket.0, initial_bracket.1)
        .with_tolerance(tolerance)
        .with_degenerate_policy(surface.policy());
    IntervalFinder::new(config).find_interval_for(surface, events)
}
