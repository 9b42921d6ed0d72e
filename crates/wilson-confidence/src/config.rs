//! Interval finder configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use wilson_core::{Error, Result};
use wilson_likelihood::DegeneratePolicy;

/// Settings shared by the minimizer, the root finder and the report curve
///
/// Missing fields in a JSON document fall back to [`Default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalConfig {
    pub confidence_level: f64,
    /// Starting bracket for the minimizer, expanded as needed
    pub initial_bracket: (f64, f64),
    /// Relative tolerance for the minimizer, absolute for the roots
    pub tolerance: f64,
    /// Distance from the point estimate to the first root guesses
    pub root_offset: f64,
    pub max_iterations: usize,
    pub max_bracket_expansions: usize,
    pub degrees_of_freedom: f64,
    /// Padding around the interval when sampling the report curve
    pub curve_margin: f64,
    pub curve_points: usize,
    /// Solve both sides concurrently when the `parallel` feature is on
    pub parallel_roots: bool,
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            initial_bracket: (-10.0, 10.0),
            tolerance: 1e-6,
            root_offset: 0.01,
            max_iterations: 500,
            max_bracket_expansions: 100,
            degrees_of_freedom: 1.0,
            curve_margin: 0.01,
            curve_points: 50,
            parallel_roots: true,
            degenerate_policy: DegeneratePolicy::default(),
        }
    }
}

impl IntervalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_initial_bracket(mut self, low: f64, high: f64) -> Self {
        self.initial_bracket = (low, high);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_root_offset(mut self, offset: f64) -> Self {
        self.root_offset = offset;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_bracket_expansions(mut self, max_expansions: usize) -> Self {
        self.max_bracket_expansions = max_expansions;
        self
    }

    pub fn with_degrees_of_freedom(mut self, dof: f64) -> Self {
        self.degrees_of_freedom = dof;
        self
    }

    pub fn with_curve(mut self, margin: f64, points: usize) -> Self {
        self.curve_margin = margin;
        self.curve_points = points;
        self
    }

    pub fn with_parallel_roots(mut self, parallel: bool) -> Self {
        self.parallel_roots = parallel;
        self
    }

    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    /// Check solver settings
    ///
    /// The confidence level is checked separately when an interval is
    /// requested, so that it surfaces as [`Error::InvalidConfidenceLevel`].
    pub fn validate(&self) -> Result<()> {
        let (low, high) = self.initial_bracket;
        if !low.is_finite() || !high.is_finite() || low == high {
            return Err(Error::InvalidParameter(format!(
                "Initial bracket ({low}, {high}) must be two distinct finite points"
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "Tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.root_offset > 0.0 && self.root_offset.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "Root offset must be positive, got {}",
                self.root_offset
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.degrees_of_freedom > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "Degrees of freedom must be positive, got {}",
                self.degrees_of_freedom
            )));
        }
        if self.curve_points < 2 || !(self.curve_margin >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "Curve needs at least 2 points and a non-negative margin, got {} and {}",
                self.curve_points, self.curve_margin
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("Invalid interval config: {}", e)))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
