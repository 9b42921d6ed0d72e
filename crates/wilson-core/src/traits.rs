//! Capability traits shared across the workspace
//!
//! The two regression models behind a ratio estimate are opaque to the
//! inference code. All it needs is the ability to map a batch of events to
//! one scalar per event, which is what [`EventFunction`] captures. Trained
//! networks, analytic formulas and test stubs all plug in through it.

use crate::{Error, Kinematics, Result};
use std::sync::Arc;

/// A pure, deterministic map from events to one scalar per event
pub trait EventFunction: Send + Sync {
    /// Evaluate the function on every event
    ///
    /// Implementations must return exactly `kinematics.n_events()` values.
    fn evaluate(&self, kinematics: &Kinematics) -> Result<Vec<f64>>;

    /// Short label used in logs and reports
    fn name(&self) -> &str {
        "event-function"
    }
}

impl<T: EventFunction + ?Sized> EventFunction for &T {
    fn evaluate(&self, kinematics: &Kinematics) -> Result<Vec<f64>> {
        (**self).evaluate(kinematics)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: EventFunction + ?Sized> EventFunction for Box<T> {
    fn evaluate(&self, kinematics: &Kinematics) -> Result<Vec<f64>> {
        (**self).evaluate(kinematics)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: EventFunction + ?Sized> EventFunction for Arc<T> {
    fn evaluate(&self, kinematics: &Kinematics) -> Result<Vec<f64>> {
        (**self).evaluate(kinematics)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Evaluate and check the output shape and finiteness
pub fn evaluate_checked<F>(function: &F, kinematics: &Kinematics) -> Result<Vec<f64>>
where
    F: EventFunction + ?Sized,
{
    let values = function.evaluate(kinematics)?;
    if values.len() != kinematics.n_events() {
        return Err(Error::size_mismatch(
            kinematics.n_events(),
            values.len(),
            &format!("output of '{}'", function.name()),
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::non_finite(&format!("output of '{}'", function.name())));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureSchema;

    struct Truncated;

    impl EventFunction for Truncated {
        fn evaluate(&self, kinematics: &Kinematics) -> Result<Vec<f64>> {
            Ok(vec![0.0; kinematics.n_events().saturating_sub(1)])
        }

        fn name(&self) -> &str {
            "truncated"
        }
    }

    #[test]
    fn test_evaluate_checked_rejects_wrong_length() {
        let schema = FeatureSchema::new(["x"]).unwrap();
        let kin = Kinematics::new(schema, vec![1.0, 2.0, 3.0]).unwrap();

        let err = evaluate_checked(&Truncated, &kin).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_smart_pointer_impls_forward() {
        let schema = FeatureSchema::new(["x"]).unwrap();
        let kin = Kinematics::new(schema, vec![1.0]).unwrap();

        let boxed: Box<dyn EventFunction> = Box::new(Truncated);
        let shared: Arc<dyn EventFunction> = Arc::new(Truncated);
        assert_eq!(boxed.name(), "truncated");
        assert_eq!(shared.evaluate(&kin).unwrap(), Vec::<f64>::new());
    }
}
