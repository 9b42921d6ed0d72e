//! Common types for profile-likelihood intervals

use serde::{Deserialize, Serialize};
use std::fmt;
use wilson_core::{Error, Result};

/// A confidence interval on the Wilson coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound of the interval
    pub lower: f64,
    /// Upper bound of the interval
    pub upper: f64,
    /// Coefficient minimizing the LLR surface
    pub point_estimate: f64,
    /// LLR value at the point estimate
    pub min_llr: f64,
    /// Confidence level (e.g., 0.95 for 95% CI)
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    /// Create a new confidence interval
    pub fn new(lower: f64, upper: f64, point_estimate: f64, min_llr: f64, confidence_level: f64) -> Self {
        Self {
            lower,
            upper,
            point_estimate,
            min_llr,
            confidence_level,
        }
    }

    /// Width of the confidence interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Check if a value is contained in the interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Distances from the point estimate down to `lower` and up to `upper`
    pub fn asymmetric_errors(&self) -> (f64, f64) {
        (self.point_estimate - self.lower, self.upper - self.point_estimate)
    }
}

impl fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}% CI: [{:.6}, {:.6}], estimate: {:.6}",
            self.confidence_level * 100.0,
            self.lower,
            self.upper,
            self.point_estimate
        )
    }
}

/// Confidence level type with validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// Create a new confidence level
    ///
    /// Fails unless `level` lies strictly between 0 and 1.
    pub fn new(level: f64) -> Result<Self> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(Error::InvalidConfidenceLevel(level))
        }
    }

    /// Get the confidence level value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the alpha level (1 - confidence level)
    pub fn alpha(&self) -> f64 {
        1.0 - self.0
    }

    /// One standard deviation for a Gaussian
    pub const ONE_SIGMA: Self = Self(0.682_689_492_137_086);
    pub const NINETY_FIVE: Self = Self(0.95);
    pub const NINETY_NINE: Self = Self(0.99);
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = Error;

    fn try_from(level: f64) -> Result<Self> {
        Self::new(level)
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Test statistic sampled over a coefficient range, for plotting only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestStatisticCurve {
    points: Vec<(f64, f64)>,
}

impl TestStatisticCurve {
    /// Evaluate `statistic` at `n_points` evenly spaced values in `[start, end]`
    pub fn sample<F>(mut statistic: F, start: f64, end: f64, n_points: usize) -> Result<Self>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        if n_points < 2 {
            return Err(Error::InvalidParameter(format!(
                "A curve needs at least 2 points, got {n_points}"
            )));
        }
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(Error::InvalidParameter(format!(
                "Invalid curve range [{start}, {end}]"
            )));
        }
        let step = (end - start) / (n_points - 1) as f64;
        let points = (0..n_points)
            .map(|i| {
                let c = if i + 1 == n_points { end } else { start + step * i as f64 };
                statistic(c).map(|t| (c, t))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample with the smallest statistic value
    pub fn minimum(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .copied()
            .filter(|(_, t)| !t.is_nan())
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
