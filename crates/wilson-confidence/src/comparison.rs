//! Several ratio-estimator pairs scored against one event set

use crate::cutoff::CutoffStrategy;
use crate::finder::IntervalFinder;
use crate::minimize::ScalarMinimizer;
use crate::report::{IntervalReport, ReportingSink};
use crate::roots::RootFinder;
use tracing::{debug, instrument};
use wilson_core::{EventFunction, Result, WeightedEventSet};
use wilson_likelihood::{LikelihoodSurface, RatioEstimator};
use wilson_yield::YieldModel;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of one named model
#[derive(Debug)]
pub struct ModelOutcome {
    pub name: String,
    pub result: Result<IntervalReport>,
}

impl ModelOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Interval report for every named estimator pair
///
/// A failing model does not stop the others; its error is kept in its
/// outcome. Outcomes are returned in input order.
#[instrument(skip_all, fields(n_models = models.len(), n_events = events.len()))]
pub fn compare_models<C, M, R, A, B>(
    finder: &IntervalFinder<C, M, R>,
    yield_model: &YieldModel,
    events: &WeightedEventSet,
    models: &[(String, RatioEstimator<A, B>)],
) -> Vec<ModelOutcome>
where
    C: CutoffStrategy,
    M: ScalarMinimizer,
    R: RootFinder,
    A: EventFunction,
    B: EventFunction,
{
    let run = |(name, estimator): &(String, RatioEstimator<A, B>)| {
        let result = evaluate_model(finder, yield_model, events, estimator);
        if let Err(e) = &result {
            debug!(model = %name, error = %e, "Interval search failed");
        }
        ModelOutcome {
            name: name.clone(),
            result,
        }
    };

    #[cfg(feature = "parallel")]
    let outcomes = models.par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes = models.iter().map(run).collect();

    outcomes
}

fn evaluate_model<C, M, R, A, B>(
    finder: &IntervalFinder<C, M, R>,
    yield_model: &YieldModel,
    events: &WeightedEventSet,
    estimator: &RatioEstimator<A, B>,
) -> Result<IntervalReport>
where
    C: CutoffStrategy,
    M: ScalarMinimizer,
    R: RootFinder,
    A: EventFunction,
    B: EventFunction,
{
    let surface = LikelihoodSurface::new(
        *yield_model,
        RatioEstimator::new(estimator.alpha(), estimator.beta()),
    )
    .with_policy(finder.config().degenerate_policy);
    let bound = surface.bind(events)?;
    finder.report(&bound)
}

/// Send every successful outcome to `sink`
///
/// Returns how many reports were delivered.
pub fn report_all<S>(outcomes: &[ModelOutcome], sink: &S) -> Result<usize>
where
    S: ReportingSink + ?Sized,
{
    let mut delivered = 0;
    for outcome in outcomes {
        if let Ok(report) = &outcome.result {
            sink.report(&outcome.name, report)?;
            delivered += 1;
        }
    }
    Ok(delivered)
}
