//! Adapters that turn plain closures and formulas into [`EventFunction`]s
//!
//! Trained models are loaded outside this workspace. These adapters cover
//! the remaining sources: per-event closures, whole-batch closures, and the
//! constant and linear forms used for analytic checks and test stubs.

use crate::{Error, EventFunction, Kinematics, Result};

/// Applies a closure to each event's feature row
#[derive(Clone)]
pub struct PerEventFn<F> {
    name: String,
    func: F,
}

impl<F> PerEventFn<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> EventFunction for PerEventFn<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, kinematics: &Kinematics) -> Result<Vec<f64>> {
        Ok(kinematics.rows().map(|row| (self.func)(row)).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Hands the whole batch to a closure, e.g. a model's batched forward pass
#[derive(Clone)]
pub struct BatchFn<F> {
    name: String,
    func: F,
}

impl<F> BatchFn<F>
where
    F: Fn(&Kinematics) -> Result<Vec<f64>> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> EventFunction for BatchFn<F>
where
    F: Fn(&Kinematics) -> Result<Vec<f64>> + Send + Sync,
{
    fn evaluate(&self, kinematics: &Kinematics) -> Result<Vec<f64>> {
        (self.func)(kinematics)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Returns the same value for every event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl EventFunction for Constant {
    fn evaluate(&self, kinematics: &Kinematics) -> Result<Vec<f64>> {
        Ok(vec![self.0; kinematics.n_events()])
    }

    fn name(&self) -> &str {
        "constant"
    }
}

/// `bias + Σ weights[j] · x[j]`
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    weights: Vec<f64>,
    bias: f64,
}

impl Linear {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }
}

impl EventFunction for Linear {
    fn evaluate(&self, kinematics: &Kinematics) -> Result<Vec<f64>> {
        if kinematics.n_features() != self.weights.len() {
            return Err(Error::size_mismatch(
                self.weights.len(),
                kinematics.n_features(),
                "linear function features",
            ));
        }
        Ok(kinematics
            .rows()
            .map(|row| {
                self.bias
                    + row
                        .iter()
                        .zip(&self.weights)
                        .map(|(x, w)| x * w)
                        .sum::<f64>()
            })
            .collect())
    }

    fn name(&self) -> &str {
        "linear"
    }
}

/// Wrap a per-event closure
#[inline]
pub fn per_event<F>(name: impl Into<String>, func: F) -> PerEventFn<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    PerEventFn::new(name, func)
}

/// Wrap a batched closure
#[inline]
pub fn batch<F>(name: impl Into<String>, func: F) -> BatchFn<F>
where
    F: Fn(&Kinematics) -> Result<Vec<f64>> + Send + Sync,
{
    BatchFn::new(name, func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureSchema;

    fn kinematics() -> Kinematics {
        let schema = FeatureSchema::new(["a", "b"]).unwrap();
        Kinematics::from_rows(schema, &[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap()
    }

    #[test]
    fn test_per_event_closure() {
        let f = per_event("sum", |row: &[f64]| row.iter().sum());
        assert_eq!(f.evaluate(&kinematics()).unwrap(), vec![3.0, 7.0]);
        assert_eq!(f.name(), "sum");
    }

    #[test]
    fn test_batch_closure() {
        let f = batch("first", |k: &Kinematics| Ok(k.rows().map(|r| r[0]).collect()));
        assert_eq!(f.evaluate(&kinematics()).unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_constant_and_linear() {
        assert_eq!(Constant(0.25).evaluate(&kinematics()).unwrap(), vec![0.25, 0.25]);

        let lin = Linear::new(vec![0.5, -1.0], 1.0);
        assert_eq!(lin.evaluate(&kinematics()).unwrap(), vec![-0.5, -1.5]);

        let wrong_width = Linear::new(vec![1.0], 0.0);
        assert!(wrong_width.evaluate(&kinematics()).is_err());
    }
}
