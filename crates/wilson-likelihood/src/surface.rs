//! Log-likelihood-ratio surface over the Wilson coefficient
//!
//! For an event set with multiplicities `m_i` the extended log-likelihood
//! ratio against the standard-model point `c = 0` is
//!
//! ```text
//! LLR(c) = Y(c) − Y(0) − Σ_i m_i · ln r(x_i; c)
//! ```
//!
//! With this sign convention the best-fit coefficient minimizes the surface.

use crate::ratio::{EventResponses, RatioEstimator};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wilson_core::{Error, EventFunction, Result, WeightedEventSet};
use wilson_yield::YieldModel;

/// What to do when an event's ratio estimate is exactly zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Let `ln 0 = -inf` flow into the surface value
    #[default]
    Propagate,
    /// Fail with [`Error::DegenerateRatio`]
    Reject,
}

/// Anything that can report the LLR at a coefficient value
pub trait LogLikelihoodRatio: Send + Sync {
    fn log_likelihood_ratio(&self, coefficient: f64) -> Result<f64>;
}

impl<F> LogLikelihoodRatio for F
where
    F: Fn(f64) -> Result<f64> + Send + Sync,
{
    fn log_likelihood_ratio(&self, coefficient: f64) -> Result<f64> {
        self(coefficient)
    }
}

/// Yield model plus ratio estimator, ready to score event sets
#[derive(Debug, Clone)]
pub struct LikelihoodSurface<A, B> {
    yield_model: YieldModel,
    estimator: RatioEstimator<A, B>,
    policy: DegeneratePolicy,
}

impl<A, B> LikelihoodSurface<A, B>
where
    A: EventFunction,
    B: EventFunction,
{
    pub fn new(yield_model: YieldModel, estimator: RatioEstimator<A, B>) -> Self {
        Self {
            yield_model,
            estimator,
            policy: DegeneratePolicy::default(),
        }
    }

    /// Set the degenerate-ratio policy
    pub fn with_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn yield_model(&self) -> &YieldModel {
        &self.yield_model
    }

    pub fn estimator(&self) -> &RatioEstimator<A, B> {
        &self.estimator
    }

    pub fn policy(&self) -> DegeneratePolicy {
        self.policy
    }

    /// LLR of `events` at `coefficient`
    ///
    /// Evaluates both models on every call. Use [`bind`](Self::bind) when the
    /// same events are scored at many coefficient values.
    pub fn log_likelihood_ratio(&self, events: &WeightedEventSet, coefficient: f64) -> Result<f64> {
        self.bind(events)?.log_likelihood_ratio(coefficient)
    }

    /// Fix the event set and cache the model responses
    pub fn bind(&self, events: &WeightedEventSet) -> Result<BoundSurface> {
        self.bind_with_policy(events, self.policy)
    }

    /// Like [`bind`](Self::bind), with `policy` overriding the surface's own
    pub fn bind_with_policy(
        &self,
        events: &WeightedEventSet,
        policy: DegeneratePolicy,
    ) -> Result<BoundSurface> {
        let responses = self.estimator.responses(events.kinematics())?;
        BoundSurface::new(
            self.yield_model,
            responses,
            events.multiples().to_vec(),
            policy,
        )
    }
}

/// LLR surface of one event set with cached model responses
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSurface {
    yield_model: YieldModel,
    reference_yield: f64,
    responses: EventResponses,
    multiples: Vec<f64>,
    policy: DegeneratePolicy,
}

impl BoundSurface {
    pub fn new(
        yield_model: YieldModel,
        responses: EventResponses,
        multiples: Vec<f64>,
        policy: DegeneratePolicy,
    ) -> Result<Self> {
        if responses.len() != multiples.len() {
            return Err(Error::size_mismatch(
                multiples.len(),
                responses.len(),
                "model responses",
            ));
        }
        Ok(Self {
            reference_yield: yield_model.evaluate(0.0),
            yield_model,
            responses,
            multiples,
            policy,
        })
    }

    pub fn n_events(&self) -> usize {
        self.multiples.len()
    }

    pub fn responses(&self) -> &EventResponses {
        &self.responses
    }

    /// `Σ m_i · ln r_i` at `coefficient`
    ///
    /// Events with zero multiplicity contribute nothing, even where their
    /// ratio estimate vanishes.
    pub fn weighted_log_ratio(&self, coefficient: f64) -> Result<f64> {
        let mut total = 0.0;
        let mut degenerate = 0usize;
        for (event, &multiple) in self.multiples.iter().enumerate() {
            if multiple == 0.0 {
                continue;
            }
            let ratio = self.responses.ratio(event, coefficient);
            if ratio <= 0.0 {
                if self.policy == DegeneratePolicy::Reject {
                    return Err(Error::DegenerateRatio { coefficient, event });
                }
                degenerate += 1;
            }
            total += multiple * ratio.ln();
        }
        if degenerate > 0 {
            debug!(coefficient, degenerate, "Ratio estimate vanished for some events");
        }
        Ok(total)
    }
}

impl LogLikelihoodRatio for BoundSurface {
    fn log_likelihood_ratio(&self, coefficient: f64) -> Result<f64> {
        let log_ratio = self.weighted_log_ratio(coefficient)?;
        Ok(self.yield_model.evaluate(coefficient) - self.reference_yield - log_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wilson_core::{Constant, FeatureSchema, Kinematics};
    use wilson_yield::YieldModelCoefficients;

    fn events(multiples: Vec<f64>) -> WeightedEventSet {
        let schema = FeatureSchema::new(["x"]).unwrap();
        let data = (0..multiples.len()).map(|i| i as f64).collect();
        WeightedEventSet::new(Kinematics::new(schema, data).unwrap(), multiples).unwrap()
    }

    fn yield_model() -> YieldModel {
        YieldModel::from_coefficients(YieldModelCoefficients::new(1000.0, 1000.0, 250.0))
    }

    #[test]
    fn test_standard_model_point_is_exactly_zero() {
        let surface = LikelihoodSurface::new(
            yield_model(),
            RatioEstimator::new(Constant(0.0), Constant(0.0)),
        );
        let llr = surface.log_likelihood_ratio(&events(vec![3.0, 1.0, 2.0]), 0.0).unwrap();
        assert_eq!(llr, 0.0);
    }

    #[test]
    fn test_matches_closed_form() {
        // α = 0.5, β = 0: r = (1 + c/2)², Y(c) = 1000·(1 + c/2)²
        let surface = LikelihoodSurface::new(
            yield_model(),
            RatioEstimator::new(Constant(0.5), Constant(0.0)),
        );
        let events = events(vec![1000.0, 1250.0]);

        for c in [-1.0, 0.5, 1.0, 3.0] {
            let u: f64 = 1.0 + 0.5 * c;
            let expected = 1000.0 * (u * u - 1.0) - 2250.0 * (u * u).ln();
            let llr = surface.log_likelihood_ratio(&events, c).unwrap();
            assert_relative_eq!(llr, expected, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_bound_surface_agrees_with_direct_evaluation() {
        let surface = LikelihoodSurface::new(
            yield_model(),
            RatioEstimator::new(Constant(0.3), Constant(0.2)),
        );
        let events = events(vec![5.0, 7.0, 11.0]);
        let bound = surface.bind(&events).unwrap();

        for c in [-2.0, 0.0, 0.7] {
            assert_eq!(
                bound.log_likelihood_ratio(c).unwrap(),
                surface.log_likelihood_ratio(&events, c).unwrap()
            );
        }
    }

    #[test]
    fn test_zero_ratio_propagates_infinity() {
        // r vanishes at c = 1 when α = -1, β = 0
        let surface = LikelihoodSurface::new(
            yield_model(),
            RatioEstimator::new(Constant(-1.0), Constant(0.0)),
        );
        let llr = surface.log_likelihood_ratio(&events(vec![2.0, 1.0]), 1.0).unwrap();
        assert_eq!(llr, f64::INFINITY);
    }

    #[test]
    fn test_zero_ratio_rejected_under_policy() {
        let surface = LikelihoodSurface::new(
            yield_model(),
            RatioEstimator::new(Constant(-1.0), Constant(0.0)),
        )
        .with_policy(DegeneratePolicy::Reject);

        match surface.log_likelihood_ratio(&events(vec![0.0, 1.0]), 1.0) {
            Err(Error::DegenerateRatio { coefficient, event }) => {
                assert_eq!(coefficient, 1.0);
                assert_eq!(event, 1);
            }
            other => panic!("Expected DegenerateRatio, got {other:?}"),
        }
    }

    #[test]
    fn test_bind_with_policy_overrides_surface_policy() {
        let surface = LikelihoodSurface::new(
            yield_model(),
            RatioEstimator::new(Constant(-1.0), Constant(0.0)),
        );
        assert_eq!(surface.policy(), DegeneratePolicy::Propagate);

        let bound = surface
            .bind_with_policy(&events(vec![2.0, 1.0]), DegeneratePolicy::Reject)
            .unwrap();
        assert!(matches!(
            bound.log_likelihood_ratio(1.0),
            Err(Error::DegenerateRatio { event: 0, .. })
        ));
    }

    #[test]
    fn test_zero_multiplicity_skips_degenerate_event() {
        let surface = LikelihoodSurface::new(
            yield_model(),
            RatioEstimator::new(Constant(-1.0), Constant(0.0)),
        );
        let llr = surface.log_likelihood_ratio(&events(vec![0.0, 0.0]), 1.0).unwrap();
        assert_relative_eq!(llr, yield_model().evaluate(1.0) - yield_model().evaluate(0.0));
    }

    #[test]
    fn test_policy_serde() {
        let policy: DegeneratePolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(policy, DegeneratePolicy::Reject);
    }

    #[test]
    fn test_closures_are_surfaces() {
        let parabola = |c: f64| -> Result<f64> { Ok((c - 1.0) * (c - 1.0)) };
        assert_eq!(parabola.log_likelihood_ratio(3.0).unwrap(), 4.0);
    }
}
