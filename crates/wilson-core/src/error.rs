//! Error types for Wilson-coefficient inference
//!
//! Provides a unified error type for all wilson-stats crates.

use std::fmt;
use thiserror::Error;

/// Which side of the point estimate a root search was looking on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lower,
    Upper,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Lower => write!(f, "lower"),
            Side::Upper => write!(f, "upper"),
        }
    }
}

/// Core error type for interval estimation
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} points, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A weight-column name could not be decoded into a coefficient value
    #[error("Malformed key '{key}': {reason}")]
    MalformedKey { key: String, reason: String },

    /// Confidence level outside the open interval (0, 1)
    #[error("Invalid confidence level {0}: must be strictly between 0 and 1")]
    InvalidConfidenceLevel(f64),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// The minimizer ran out of budget before converging
    #[error("Optimization diverged after {iterations} iterations: {reason}")]
    OptimizationDiverged { iterations: usize, reason: String },

    /// A root search failed to bracket or converge
    #[error("Root not found on the {side} side: {reason}")]
    RootNotFound { side: Side, reason: String },

    /// Post-hoc ordering check on a finished interval failed
    #[error("Inconsistent interval: expected {lower} <= {estimate} <= {upper}")]
    IntervalInconsistent { lower: f64, estimate: f64, upper: f64 },

    /// A ratio estimate was non-positive under a rejecting policy
    #[error("Degenerate ratio estimate at coefficient {coefficient} (event {event})")]
    DegenerateRatio { coefficient: f64, event: usize },

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!("{context} contains NaN or infinite values"))
    }

    /// Create a malformed-key error
    pub fn malformed_key(key: &str, reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a root-finding failure for one side of the interval
    pub fn root_not_found(side: Side, reason: impl Into<String>) -> Self {
        Self::RootNotFound {
            side,
            reason: reason.into(),
        }
    }
}
