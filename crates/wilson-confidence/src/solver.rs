//! Glue between fallible scalar closures and argmin's executor

use argmin::core::{CostFunction, TerminationReason, TerminationStatus};
use std::cell::{Cell, RefCell};
use wilson_core::{Error, Result};

/// A `FnMut(f64) -> Result<f64>` seen as an argmin cost function
pub(crate) struct ScalarCost<'a, F> {
    f: &'a RefCell<F>,
    evaluations: &'a Cell<usize>,
}

impl<'a, F> ScalarCost<'a, F>
where
    F: FnMut(f64) -> Result<f64>,
{
    pub(crate) fn new(f: &'a RefCell<F>, evaluations: &'a Cell<usize>) -> Self {
        Self { f, evaluations }
    }
}

impl<'a, F> CostFunction for ScalarCost<'a, F>
where
    F: FnMut(f64) -> Result<f64>,
{
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
        self.evaluations.set(self.evaluations.get() + 1);
        let mut f = self.f.borrow_mut();
        (*f)(*x).map_err(argmin::core::Error::from)
    }
}

/// Recover our own error from a failed run, or build one with `fallback`
pub(crate) fn from_argmin<G>(err: argmin::core::Error, fallback: G) -> Error
where
    G: FnOnce(String) -> Error,
{
    match err.downcast::<Error>() {
        Ok(ours) => ours,
        Err(other) => fallback(other.to_string()),
    }
}

pub(crate) fn converged(status: &TerminationStatus) -> bool {
    matches!(
        status,
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
            | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_errors_survive_the_round_trip() {
        let err = argmin::core::Error::from(Error::DegenerateRatio {
            coefficient: 1.0,
            event: 3,
        });
        let back = from_argmin(err, Error::Computation);
        assert!(matches!(back, Error::DegenerateRatio { event: 3, .. }));
    }

    #[test]
    fn test_foreign_errors_use_fallback() {
        let err = argmin::core::Error::msg("bracket collapsed");
        let back = from_argmin(err, Error::Computation);
        match back {
            Error::Computation(reason) => assert!(reason.contains("bracket collapsed")),
            other => panic!("Expected Computation, got {other:?}"),
        }
    }

    #[test]
    fn test_cost_counts_evaluations() {
        let f = RefCell::new(|x: f64| -> Result<f64> { Ok(x * x) });
        let count = Cell::new(0);
        let cost = ScalarCost::new(&f, &count);
        assert_eq!(cost.cost(&3.0).unwrap(), 9.0);
        assert_eq!(cost.cost(&-1.0).unwrap(), 1.0);
        assert_eq!(count.get(), 2);
    }
}
