//! Total-yield modelling for Wilson-coefficient scans
//!
//! Reference samples are reweighted to several coefficient values, one weight
//! column per value. Summing each column gives the expected total yield at
//! that value; a quadratic through those points is the [`YieldModel`].
//!
//! # Example
//!
//! ```rust
//! use wilson_yield::{KeyCodec, ReferenceWeightTable, YieldModel};
//!
//! let table = ReferenceWeightTable::from_sums([
//!     ("weight_sm", 100.0),
//!     ("weight_pos1p0", 130.0),
//!     ("weight_neg1p0", 90.0),
//! ])
//! .unwrap();
//!
//! let model = YieldModel::fit(&table, &KeyCodec::default()).unwrap();
//! assert!((model.evaluate(1.0) - 130.0).abs() < 1e-9);
//! ```

pub mod key;
pub mod model;
pub mod table;

pub use key::{decode_key, KeyCodec, WeightKey};
pub use model::{YieldModel, YieldModelCoefficients, MIN_FIT_POINTS};
pub use table::ReferenceWeightTable;
