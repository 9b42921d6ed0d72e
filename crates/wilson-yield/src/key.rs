//! Weight-column key codec
//!
//! Reference samples carry one weight column per simulated coefficient value.
//! The value is spelled into the column name: `weight_pos1p0` is `1.0`,
//! `weight_neg2p5` is `-2.5`, and `weight_sm` is the standard-model point at
//! `0.0`. Names may carry an operator tag before the value
//! (`weight_cHW_pos1p0`); only the last `_`-separated segment is decoded.

use serde::{Deserialize, Serialize};
use wilson_core::{Error, Result};

/// A decoded weight-column name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightKey {
    /// The standard-model column, coefficient 0
    StandardModel,
    /// A column simulated at the given coefficient
    Coefficient(f64),
}

impl WeightKey {
    /// Coefficient value this column was simulated at
    pub fn value(&self) -> f64 {
        match self {
            WeightKey::StandardModel => 0.0,
            WeightKey::Coefficient(c) => *c,
        }
    }

    pub fn is_standard_model(&self) -> bool {
        matches!(self, WeightKey::StandardModel)
    }
}

/// Naming convention for weight columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyCodec {
    pub prefix: String,
    pub sentinel: String,
    pub positive_marker: String,
    pub negative_marker: String,
    pub decimal_marker: String,
}

impl Default for KeyCodec {
    fn default() -> Self {
        Self {
            prefix: "weight_".to_string(),
            sentinel: "sm".to_string(),
            positive_marker: "pos".to_string(),
            negative_marker: "neg".to_string(),
            decimal_marker: "p".to_string(),
        }
    }
}

impl KeyCodec {
    /// Whether a column name follows the weight-column convention
    pub fn is_weight_column(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }

    /// Decode a column name into the coefficient it was simulated at
    pub fn decode(&self, key: &str) -> Result<WeightKey> {
        let body = key
            .strip_prefix(&self.prefix)
            .ok_or_else(|| Error::malformed_key(key, format!("missing prefix '{}'", self.prefix)))?;

        if body == self.sentinel {
            return Ok(WeightKey::StandardModel);
        }

        let segment = body.rsplit('_').next().unwrap_or(body);
        if segment.is_empty() {
            return Err(Error::malformed_key(key, "empty value segment"));
        }

        // Marker order matters: the positive marker contains the decimal one.
        let number = segment
            .replace(&self.positive_marker, "")
            .replace(&self.negative_marker, "-")
            .replace(&self.decimal_marker, ".");

        let value: f64 = number
            .parse()
            .map_err(|_| Error::malformed_key(key, format!("'{number}' is not a number")))?;
        if !value.is_finite() {
            return Err(Error::malformed_key(key, "value is not finite"));
        }
        Ok(WeightKey::Coefficient(value))
    }

    /// Spell a coefficient value as a column name
    pub fn encode(&self, value: f64) -> Result<String> {
        if !value.is_finite() {
            return Err(Error::non_finite("weight key value"));
        }
        let sign = if value < 0.0 {
            &self.negative_marker
        } else {
            &self.positive_marker
        };
        let magnitude = value.abs();
        let digits = if magnitude.fract() == 0.0 {
            format!("{magnitude:.1}")
        } else {
            magnitude.to_string()
        };
        Ok(format!(
            "{}{}{}",
            self.prefix,
            sign,
            digits.replace('.', &self.decimal_marker)
        ))
    }

    /// Name of the standard-model column
    pub fn standard_model_key(&self) -> String {
        format!("{}{}", self.prefix, self.sentinel)
    }
}

/// Decode with the default naming convention
pub fn decode_key(key: &str) -> Result<WeightKey> {
    KeyCodec::default().decode(key)
}
