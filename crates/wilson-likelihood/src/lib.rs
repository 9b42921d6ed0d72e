//! Likelihood machinery for a single Wilson coefficient
//!
//! - [`RatioEstimator`] turns two opaque per-event models into differential
//!   cross-section ratio estimates
//! - [`LikelihoodSurface`] combines those with a [`YieldModel`] into the
//!   extended log-likelihood ratio against the standard-model point
//! - [`BoundSurface`] fixes one event set and caches the model outputs so the
//!   surface can be scanned cheaply
//!
//! [`YieldModel`]: wilson_yield::YieldModel

pub mod ratio;
pub mod surface;

pub use ratio::{estimate, ratio_estimate, EventResponses, RatioEstimator};
pub use surface::{BoundSurface, DegeneratePolicy, LikelihoodSurface, LogLikelihoodRatio};
