//! One-dimensional minimization of the LLR surface
//!
//! The bracket supplied by the caller is only a hint. It is first expanded
//! downhill with golden-ratio steps until it encloses a minimum, then argmin's
//! Brent optimizer refines it.

use crate::solver::{converged, from_argmin, ScalarCost};
use argmin::core::{Executor, State};
use argmin::solver::brent::BrentOpt;
use std::cell::{Cell, RefCell};
use tracing::debug;
use wilson_core::{Error, Result};

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;
/// Absolute floor on the minimizer tolerance near zero
const TINY: f64 = 1e-11;

/// Outcome of a scalar minimization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizeResult {
    /// Location of the minimum
    pub x: f64,
    /// Objective value at `x`
    pub fun: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

/// Minimizes a scalar function of one variable
pub trait ScalarMinimizer: Send + Sync {
    fn minimize<F>(&self, f: F, bracket: (f64, f64)) -> Result<MinimizeResult>
    where
        F: FnMut(f64) -> Result<f64>;
}

/// Bracket expansion followed by Brent's method
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrentMinimizer {
    /// Relative tolerance on the location of the minimum
    pub tolerance: f64,
    pub max_iterations: usize,
    pub max_bracket_expansions: usize,
}

impl Default for BrentMinimizer {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 500,
            max_bracket_expansions: 100,
        }
    }
}

/// Three points with `f(b) <= f(a)` and `f(b) < f(c)`
#[derive(Debug, Clone, Copy)]
struct Bracket {
    a: f64,
    b: f64,
    c: f64,
    fb: f64,
}

impl BrentMinimizer {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_bracket_expansions(mut self, max_bracket_expansions: usize) -> Self {
        self.max_bracket_expansions = max_bracket_expansions;
        self
    }

    fn expand_bracket<F>(&self, f: &mut F, hint: (f64, f64), evaluations: &mut usize) -> Result<Bracket>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        let (mut a, mut b) = hint;
        if !a.is_finite() || !b.is_finite() || a == b {
            return Err(Error::InvalidParameter(format!(
                "Bracket ({a}, {b}) must be two distinct finite points"
            )));
        }
        let mut fa = f(a)?;
        let mut fb = f(b)?;
        *evaluations += 2;
        if fb > fa {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
        if !fb.is_finite() {
            return Err(Error::OptimizationDiverged {
                iterations: 0,
                reason: format!("objective is not finite at bracket point {b}"),
            });
        }

        let mut c = b + GOLDEN_RATIO * (b - a);
        let mut fc = f(c)?;
        *evaluations += 1;
        let mut expansions = 0;
        while fc < fb {
            if expansions >= self.max_bracket_expansions {
                return Err(Error::OptimizationDiverged {
                    iterations: expansions,
                    reason: format!("objective keeps decreasing past {c}"),
                });
            }
            a = b;
            b = c;
            fb = fc;
            c = b + GOLDEN_RATIO * (b - a);
            fc = f(c)?;
            *evaluations += 1;
            expansions += 1;
        }
        if fb == f64::NEG_INFINITY {
            return Err(Error::OptimizationDiverged {
                iterations: expansions,
                reason: "objective is unbounded below".to_string(),
            });
        }
        debug!(a, b, c, expansions, "Bracketed minimum");
        Ok(Bracket { a, b, c, fb })
    }
}

impl ScalarMinimizer for BrentMinimizer {
    fn minimize<F>(&self, mut f: F, bracket: (f64, f64)) -> Result<MinimizeResult>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        if !(self.tolerance > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "Tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        let mut evaluations = 0;
        let bracket = self.expand_bracket(&mut f, bracket, &mut evaluations)?;
        let (lo, hi) = if bracket.a < bracket.c {
            (bracket.a, bracket.c)
        } else {
            (bracket.c, bracket.a)
        };

        let objective = RefCell::new(f);
        let counter = Cell::new(0);
        let solver = BrentOpt::new(lo, hi).set_tolerance(self.tolerance, TINY);
        let res = Executor::new(ScalarCost::new(&objective, &counter), solver)
            .configure(|state| state.max_iters(self.max_iterations as u64))
            .run()
            .map_err(|e| {
                from_argmin(e, |reason| Error::OptimizationDiverged {
                    iterations: 0,
                    reason,
                })
            })?;

        let state = res.state();
        let iterations = state.get_iter() as usize;
        let evaluations = evaluations + counter.get();
        let status = state.get_termination_status();
        if !converged(status) {
            return Err(Error::OptimizationDiverged {
                iterations,
                reason: format!(
                    "no convergence to relative tolerance {} ({})",
                    self.tolerance, status
                ),
            });
        }

        let mut x = state.get_best_param().copied().unwrap_or(bracket.b);
        let mut fun = state.get_best_cost();
        // The expansion point can beat every interior evaluation on flat surfaces
        if !(fun <= bracket.fb) {
            x = bracket.b;
            fun = bracket.fb;
        }
        debug!(x, fun, iterations, evaluations, "Brent minimizer converged");
        Ok(MinimizeResult {
            x,
            fun,
            iterations,
            evaluations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parabola_inside_bracket() {
        let result = BrentMinimizer::default()
            .minimize(|x| Ok((x - 1.5).powi(2) + 2.0), (-10.0, 10.0))
            .unwrap();
        assert_abs_diff_eq!(result.x, 1.5, epsilon = 1e-5);
        assert_abs_diff_eq!(result.fun, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_minimum_outside_hint_is_found() {
        let result = BrentMinimizer::default()
            .minimize(|x| Ok((x - 40.0).powi(2)), (0.0, 1.0))
            .unwrap();
        assert_abs_diff_eq!(result.x, 40.0, epsilon = 1e-3);
    }

    #[test]
    fn test_non_quadratic_objective() {
        // Minimum of x - ln(x) at x = 1
        let result = BrentMinimizer::new(1e-8)
            .minimize(|x| Ok(if x > 0.0 { x - x.ln() } else { f64::INFINITY }), (0.5, 3.0))
            .unwrap();
        assert_abs_diff_eq!(result.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unbounded_objective_diverges() {
        let err = BrentMinimizer::default()
            .minimize(|x| Ok(-x), (0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::OptimizationDiverged { .. }));
    }

    #[test]
    fn test_iteration_budget_is_enforced() {
        let err = BrentMinimizer::new(1e-12)
            .with_max_iterations(2)
            .minimize(|x| Ok((x - 0.3).powi(2)), (-10.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, Error::OptimizationDiverged { .. }));
    }

    #[test]
    fn test_objective_errors_propagate() {
        let err = BrentMinimizer::default()
            .minimize(|_| Err(Error::Computation("boom".to_string())), (0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }

    #[test]
    fn test_objective_errors_inside_bracket_propagate() {
        // Fails only between the bracket ends, i.e. during refinement
        let err = BrentMinimizer::default()
            .minimize(
                |x| {
                    if x > 0.2 && x < 0.8 {
                        Err(Error::DegenerateRatio { coefficient: x, event: 0 })
                    } else {
                        Ok((x - 0.5).powi(2))
                    }
                },
                (0.0, 1.0),
            )
            .unwrap_err();
        assert!(matches!(err, Error::DegenerateRatio { .. }));
    }

    #[test]
    fn test_degenerate_hint_rejected() {
        assert!(BrentMinimizer::default().minimize(|x| Ok(x * x), (1.0, 1.0)).is_err());
    }
}
