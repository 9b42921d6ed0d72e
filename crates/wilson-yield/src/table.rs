//! Per-column weight sums of a reference sample

use crate::key::{KeyCodec, WeightKey};
use wilson_core::{Error, Result};

/// Column name to summed weight, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceWeightTable {
    entries: Vec<(String, f64)>,
}

impl ReferenceWeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-summed columns
    pub fn from_sums<I, S>(sums: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, sum) in sums {
            table.insert(name, sum)?;
        }
        Ok(table)
    }

    /// Sum every weight column of a per-event table
    ///
    /// Columns whose names do not follow `codec` are skipped, so the
    /// kinematic columns of the same table can be passed straight through.
    pub fn from_event_columns<'a, I, S>(codec: &KeyCodec, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, &'a [f64])>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (name, weights) in columns {
            let name = name.as_ref();
            if codec.is_weight_column(name) {
                table.insert(name, weights.iter().sum())?;
            }
        }
        Ok(table)
    }

    /// Add one column sum; names must be unique and sums finite
    pub fn insert(&mut self, name: impl Into<String>, sum: f64) -> Result<()> {
        let name = name.into();
        if !sum.is_finite() {
            return Err(Error::non_finite(&format!("weight sum of '{name}'")));
        }
        if self.entries.iter().any(|(n, _)| *n == name) {
            return Err(Error::InvalidInput(format!("Duplicate weight column '{name}'")));
        }
        self.entries.push((name, sum));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, sum)| *sum)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(n, s)| (n.as_str(), *s))
    }

    /// Decode every column into a `(coefficient, yield)` point
    ///
    /// Exactly one standard-model column is required.
    pub fn points(&self, codec: &KeyCodec) -> Result<Vec<(f64, f64)>> {
        let mut seen_sm = false;
        let mut points = Vec::with_capacity(self.entries.len());
        for (name, sum) in &self.entries {
            let key = codec.decode(name)?;
            if key.is_standard_model() {
                if seen_sm {
                    return Err(Error::malformed_key(name, "second standard-model column"));
                }
                seen_sm = true;
            }
            points.push((key.value(), *sum));
        }
        if !seen_sm {
            return Err(Error::malformed_key(
                &codec.standard_model_key(),
                "no standard-model column in table",
            ));
        }
        Ok(points)
    }

    /// Summed weight of the standard-model column, if present
    pub fn standard_model_total(&self, codec: &KeyCodec) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| matches!(codec.decode(name), Ok(WeightKey::StandardModel)))
            .map(|(_, sum)| *sum)
    }

    /// Rescale every column so the standard-model total equals `target`
    ///
    /// Used when the reference table was built from a subsample of a larger
    /// dataset whose normalization should be kept.
    pub fn renormalized(&self, codec: &KeyCodec, target: f64) -> Result<Self> {
        let current = self.standard_model_total(codec).ok_or_else(|| {
            Error::InvalidInput("Cannot renormalize without a standard-model column".to_string())
        })?;
        if current == 0.0 || !target.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "Cannot rescale standard-model total {current} to {target}"
            )));
        }
        let scale = target / current;
        Ok(Self {
            entries: self
                .entries
                .iter()
                .map(|(name, sum)| (name.clone(), sum * scale))
                .collect(),
        })
    }
}
