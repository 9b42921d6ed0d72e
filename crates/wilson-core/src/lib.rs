//! Core traits and types for Wilson-coefficient inference
//!
//! This crate provides the pieces every other wilson-stats crate builds on:
//!
//! - **Errors**: one [`Error`] enum and [`Result`] alias for the workspace
//! - **Events**: [`FeatureSchema`], [`Kinematics`] and [`WeightedEventSet`]
//! - **Capabilities**: the [`EventFunction`] trait for opaque per-event models
//!   plus closure and formula [`adapters`]
//!
//! # Example
//!
//! ```rust
//! use wilson_core::{adapters::per_event, EventFunction, FeatureSchema, Kinematics};
//!
//! let schema = FeatureSchema::new(["pt", "eta"]).unwrap();
//! let kin = Kinematics::from_rows(schema, &[vec![40.0, 0.5], vec![60.0, -1.0]]).unwrap();
//!
//! let alpha = per_event("alpha", |row: &[f64]| 0.01 * row[0]);
//! let values = alpha.evaluate(&kin).unwrap();
//! assert_eq!(values.len(), 2);
//! ```

pub mod adapters;
pub mod error;
pub mod events;
pub mod traits;

pub use adapters::{batch, per_event, BatchFn, Constant, Linear, PerEventFn};
pub use error::{Error, Result, Side};
pub use events::{FeatureSchema, Kinematics, WeightedEventSet};
pub use traits::{evaluate_checked, EventFunction};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
