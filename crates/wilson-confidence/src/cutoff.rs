//! Critical values for the profile-likelihood test statistic
//!
//! By Wilks' theorem `T(c) = 2·(LLR(c) − min LLR)` is asymptotically
//! chi-squared distributed with one degree of freedom per scanned parameter.
//! The interval is where `T` stays below the chi-squared quantile at the
//! requested confidence level.

use crate::types::ConfidenceLevel;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use wilson_core::{Error, Result};

/// Maps a confidence level to the test-statistic threshold
pub trait CutoffStrategy: Send + Sync {
    fn cutoff(&self, level: ConfidenceLevel) -> Result<f64>;
}

/// Chi-squared quantile cutoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquaredCutoff {
    degrees_of_freedom: f64,
}

impl ChiSquaredCutoff {
    pub fn new(degrees_of_freedom: f64) -> Self {
        Self { degrees_of_freedom }
    }

    /// One scanned parameter
    pub fn one_dof() -> Self {
        Self::new(1.0)
    }

    pub fn degrees_of_freedom(&self) -> f64 {
        self.degrees_of_freedom
    }
}

impl Default for ChiSquaredCutoff {
    fn default() -> Self {
        Self::one_dof()
    }
}

impl CutoffStrategy for ChiSquaredCutoff {
    fn cutoff(&self, level: ConfidenceLevel) -> Result<f64> {
        let dist = ChiSquared::new(self.degrees_of_freedom).map_err(|e| {
            Error::InvalidParameter(format!("Failed to create chi-squared distribution: {}", e))
        })?;
        Ok(inverse_cdf(&dist, level.value()))
    }
}

/// Fixed threshold, e.g. `1.0` for the classic `ΔLLR = 0.5` interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCutoff(pub f64);

impl CutoffStrategy for FixedCutoff {
    fn cutoff(&self, _level: ConfidenceLevel) -> Result<f64> {
        if self.0 > 0.0 && self.0.is_finite() {
            Ok(self.0)
        } else {
            Err(Error::InvalidParameter(format!(
                "Fixed cutoff must be positive and finite, got {}",
                self.0
            )))
        }
    }
}

/// Quantile of a distribution on `[0, ∞)` by bisection on its CDF
fn inverse_cdf<D: ContinuousCDF<f64, f64>>(dist: &D, p: f64) -> f64 {
    let mut low = 0.0;
    let mut high = 1.0;
    while dist.cdf(high) < p {
        low = high;
        high *= 2.0;
    }
    for _ in 0..200 {
        let mid = 0.5 * (low + high);
        if mid <= low || mid >= high {
            break;
        }
        if dist.cdf(mid) < p {
            low = mid;
        } else {
            high = mid;
        }
    }
    0.5 * (low + high)
}
