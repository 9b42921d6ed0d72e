//! Event containers with an explicit, named feature schema
//!
//! Kinematic features are addressed by name rather than by column position.
//! A [`FeatureSchema`] fixes the order and width that the ratio-estimator
//! functions expect, and [`FeatureSchema::select`] pulls exactly those columns
//! out of a wider table.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Ordered list of kinematic feature names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema from feature names
    ///
    /// Names must be non-empty and unique.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(Error::InvalidParameter(
                "Feature schema needs at least one feature".to_string(),
            ));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::InvalidParameter(format!(
                    "Duplicate feature name '{name}' in schema"
                )));
            }
        }
        Ok(Self { names })
    }

    /// Number of features per event
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of a feature within the schema
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Build [`Kinematics`] from a wider row-major table
    ///
    /// `header` names the columns of every row in `rows`. Only the schema's
    /// columns are kept, in schema order.
    pub fn select<H: AsRef<str>>(&self, header: &[H], rows: &[Vec<f64>]) -> Result<Kinematics> {
        let indices = self.column_indices(header)?;
        let mut data = Vec::with_capacity(rows.len() * self.len());
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(Error::size_mismatch(
                    header.len(),
                    row.len(),
                    &format!("table row {row_idx}"),
                ));
            }
            data.extend(indices.iter().map(|&i| row[i]));
        }
        Kinematics::new(self.clone(), data)
    }

    fn column_indices<H: AsRef<str>>(&self, header: &[H]) -> Result<Vec<usize>> {
        self.names
            .iter()
            .map(|name| {
                header
                    .iter()
                    .position(|h| h.as_ref() == name)
                    .ok_or_else(|| {
                        Error::InvalidInput(format!("Feature '{name}' missing from table header"))
                    })
            })
            .collect()
    }
}

/// Row-major matrix of per-event kinematic features
#[derive(Debug, Clone, PartialEq)]
pub struct Kinematics {
    schema: FeatureSchema,
    data: Vec<f64>,
}

impl Kinematics {
    /// Wrap row-major feature data
    ///
    /// `data.len()` must be a multiple of the schema width and every value
    /// must be finite.
    pub fn new(schema: FeatureSchema, data: Vec<f64>) -> Result<Self> {
        let width = schema.len();
        if data.len() % width != 0 {
            return Err(Error::InvalidInput(format!(
                "Feature data of length {} is not a multiple of schema width {width}",
                data.len()
            )));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("kinematic features"));
        }
        Ok(Self { schema, data })
    }

    /// Build from per-event rows that already match the schema
    pub fn from_rows(schema: FeatureSchema, rows: &[Vec<f64>]) -> Result<Self> {
        let width = schema.len();
        let mut data = Vec::with_capacity(rows.len() * width);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(Error::size_mismatch(width, row.len(), &format!("event {i}")));
            }
            data.extend_from_slice(row);
        }
        Self::new(schema, data)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn n_events(&self) -> usize {
        self.data.len() / self.schema.len()
    }

    pub fn n_features(&self) -> usize {
        self.schema.len()
    }

    /// Features of a single event, `None` past the last event
    pub fn row(&self, event: usize) -> Option<&[f64]> {
        let width = self.schema.len();
        let start = event.checked_mul(width)?;
        self.data.get(start..start.checked_add(width)?)
    }

    /// Iterate over events in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.schema.len())
    }

    /// All features of one named column
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows().map(|row| row[idx]).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Events paired with their multiplicities
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedEventSet {
    kinematics: Kinematics,
    multiples: Vec<f64>,
}

impl WeightedEventSet {
    /// Pair kinematics with row-aligned multiplicities
    pub fn new(kinematics: Kinematics, multiples: Vec<f64>) -> Result<Self> {
        if kinematics.n_events() != multiples.len() {
            return Err(Error::size_mismatch(
                kinematics.n_events(),
                multiples.len(),
                "event multiplicities",
            ));
        }
        if multiples.iter().any(|m| !m.is_finite()) {
            return Err(Error::non_finite("event multiplicities"));
        }
        Ok(Self {
            kinematics,
            multiples,
        })
    }

    /// Split a table into multiplicities and schema-selected kinematics
    pub fn from_table<H: AsRef<str>>(
        schema: &FeatureSchema,
        header: &[H],
        rows: &[Vec<f64>],
        multiplicity_column: &str,
    ) -> Result<Self> {
        let m_idx = header
            .iter()
            .position(|h| h.as_ref() == multiplicity_column)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Multiplicity column '{multiplicity_column}' missing from table header"
                ))
            })?;
        let kinematics = schema.select(header, rows)?;
        let multiples = rows.iter().map(|row| row[m_idx]).collect();
        Self::new(kinematics, multiples)
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn multiples(&self) -> &[f64] {
        &self.multiples
    }

    pub fn len(&self) -> usize {
        self.multiples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multiples.is_empty()
    }

    /// Sum of all multiplicities
    pub fn total_multiplicity(&self) -> f64 {
        self.multiples.iter().sum()
    }
}
