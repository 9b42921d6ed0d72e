//! Per-event differential cross-section ratio estimates
//!
//! Two learned functions parametrize the ratio of the differential cross
//! section at coefficient `c` to the standard-model one:
//!
//! ```text
//! r(x; c) = (1 + c·α(x))² + (c·β(x))²
//! ```
//!
//! As a sum of squares `r` is never negative. It can reach exactly zero, in
//! which case `ln r` is `-inf` downstream.

use wilson_core::{evaluate_checked, Error, EventFunction, Kinematics, Result};

/// Ratio estimate for a single event
#[inline]
pub fn ratio_estimate(alpha: f64, beta: f64, coefficient: f64) -> f64 {
    let linear = 1.0 + coefficient * alpha;
    let quadratic = coefficient * beta;
    linear * linear + quadratic * quadratic
}

/// Combines the alpha and beta models into per-event ratios
#[derive(Debug, Clone)]
pub struct RatioEstimator<A, B> {
    alpha: A,
    beta: B,
}

impl<A, B> RatioEstimator<A, B>
where
    A: EventFunction,
    B: EventFunction,
{
    pub fn new(alpha: A, beta: B) -> Self {
        Self { alpha, beta }
    }

    pub fn alpha(&self) -> &A {
        &self.alpha
    }

    pub fn beta(&self) -> &B {
        &self.beta
    }

    /// Evaluate both models once on every event
    ///
    /// The model outputs do not depend on the coefficient, so a scan over
    /// many coefficient values only needs them once.
    pub fn responses(&self, kinematics: &Kinematics) -> Result<EventResponses> {
        let alpha = evaluate_checked(&self.alpha, kinematics)?;
        let beta = evaluate_checked(&self.beta, kinematics)?;
        EventResponses::new(alpha, beta)
    }

    /// Ratio estimate of every event at `coefficient`
    pub fn estimate(&self, kinematics: &Kinematics, coefficient: f64) -> Result<Vec<f64>> {
        Ok(self.responses(kinematics)?.ratios(coefficient))
    }
}

/// Ratio estimates from a pair of models without building an estimator
pub fn estimate<A, B>(
    alpha: &A,
    beta: &B,
    kinematics: &Kinematics,
    coefficient: f64,
) -> Result<Vec<f64>>
where
    A: EventFunction + ?Sized,
    B: EventFunction + ?Sized,
{
    let alpha = evaluate_checked(alpha, kinematics)?;
    let beta = evaluate_checked(beta, kinematics)?;
    Ok(EventResponses::new(alpha, beta)?.ratios(coefficient))
}

/// Cached alpha and beta outputs for one event set
#[derive(Debug, Clone, PartialEq)]
pub struct EventResponses {
    alpha: Vec<f64>,
    beta: Vec<f64>,
}

impl EventResponses {
    pub fn new(alpha: Vec<f64>, beta: Vec<f64>) -> Result<Self> {
        if alpha.len() != beta.len() {
            return Err(Error::size_mismatch(alpha.len(), beta.len(), "beta responses"));
        }
        Ok(Self { alpha, beta })
    }

    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    #[inline]
    pub fn ratio(&self, event: usize, coefficient: f64) -> f64 {
        ratio_estimate(self.alpha[event], self.beta[event], coefficient)
    }

    pub fn ratios(&self, coefficient: f64) -> Vec<f64> {
        self.alpha
            .iter()
            .zip(&self.beta)
            .map(|(&a, &b)| ratio_estimate(a, b, coefficient))
            .collect()
    }
}
