//! Root finding on one side of the point estimate
//!
//! The test statistic minus the cutoff is negative at the point estimate and
//! grows away from it. Each side is searched separately: step outward from
//! the starting guess until the sign flips, then polish the bracket with
//! argmin's Brent-Dekker solver.

use crate::solver::{converged, from_argmin, ScalarCost};
use argmin::core::{Executor, State};
use argmin::solver::brent::BrentRoot;
use std::cell::{Cell, RefCell};
use tracing::debug;
use wilson_core::{Error, Result, Side};

/// Outcome of a root search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult {
    pub root: f64,
    pub iterations: usize,
}

/// Finds a crossing of zero on one side of an anchor point
pub trait RootFinder: Send + Sync {
    /// Root of `f` on the side of `anchor` that `guess` lies on
    ///
    /// `f(anchor)` must be negative.
    fn find_root<F>(&self, f: F, anchor: f64, guess: f64, side: Side) -> Result<RootResult>
    where
        F: FnMut(f64) -> Result<f64>;
}

/// Outward bracket expansion followed by Brent-Dekker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketingRootFinder {
    /// Absolute tolerance on the root location
    pub xtol: f64,
    pub max_iterations: usize,
    pub max_expansions: usize,
    /// Step multiplier during bracket expansion
    pub growth: f64,
}

impl Default for BracketingRootFinder {
    fn default() -> Self {
        Self {
            xtol: 1e-6,
            max_iterations: 500,
            max_expansions: 100,
            growth: 2.0,
        }
    }
}

impl BracketingRootFinder {
    pub fn new(xtol: f64) -> Self {
        Self {
            xtol,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Returns `(inside, f(inside), outside, f(outside))` with a sign change
    fn bracket<F>(&self, f: &mut F, anchor: f64, guess: f64, side: Side) -> Result<(f64, f64, f64, f64)>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        let f_anchor = f(anchor)?;
        if !(f_anchor < 0.0) {
            return Err(Error::root_not_found(
                side,
                format!("statistic is not below the cutoff at {anchor} (value {f_anchor})"),
            ));
        }

        let mut inside = anchor;
        let mut f_inside = f_anchor;
        let mut step = guess - anchor;
        let mut outside = guess;
        for _ in 0..=self.max_expansions {
            let f_outside = f(outside)?;
            if f_outside.is_nan() {
                return Err(Error::root_not_found(side, format!("statistic is NaN at {outside}")));
            }
            if f_outside >= 0.0 {
                return Ok((inside, f_inside, outside, f_outside));
            }
            inside = outside;
            f_inside = f_outside;
            step *= self.growth;
            outside = inside + step;
            if !outside.is_finite() {
                break;
            }
        }
        Err(Error::root_not_found(
            side,
            format!("no sign change found within {} expansions", self.max_expansions),
        ))
    }
}

impl RootFinder for BracketingRootFinder {
    fn find_root<F>(&self, mut f: F, anchor: f64, guess: f64, side: Side) -> Result<RootResult>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        if !(self.xtol > 0.0) || !(self.growth > 1.0) {
            return Err(Error::InvalidParameter(format!(
                "Root finder needs xtol > 0 and growth > 1, got {} and {}",
                self.xtol, self.growth
            )));
        }
        if !anchor.is_finite() || !guess.is_finite() || guess == anchor {
            return Err(Error::InvalidParameter(format!(
                "Starting guess {guess} must differ from anchor {anchor}"
            )));
        }
        match side {
            Side::Lower if guess > anchor => {
                return Err(Error::InvalidParameter(format!(
                    "Lower search must start below {anchor}, got {guess}"
                )))
            }
            Side::Upper if guess < anchor => {
                return Err(Error::InvalidParameter(format!(
                    "Upper search must start above {anchor}, got {guess}"
                )))
            }
            _ => {}
        }

        let (mut inside, _, mut outside, mut f_outside) = self.bracket(&mut f, anchor, guess, side)?;
        // Brent needs a finite value at both ends
        let mut halvings = 0;
        while f_outside.is_infinite() {
            if halvings >= self.max_iterations {
                return Err(Error::root_not_found(
                    side,
                    format!("statistic stays infinite down to {outside}"),
                ));
            }
            let mid = 0.5 * (inside + outside);
            let f_mid = f(mid)?;
            if f_mid.is_nan() {
                return Err(Error::root_not_found(side, format!("statistic is NaN at {mid}")));
            }
            if f_mid < 0.0 {
                inside = mid;
            } else {
                outside = mid;
                f_outside = f_mid;
            }
            halvings += 1;
        }
        if f_outside == 0.0 {
            return Ok(RootResult {
                root: outside,
                iterations: 0,
            });
        }
        let (lo, hi) = if inside < outside {
            (inside, outside)
        } else {
            (outside, inside)
        };

        let guarded = |c: f64| -> Result<f64> {
            let value = f(c)?;
            if value.is_nan() {
                Err(Error::root_not_found(side, format!("statistic is NaN at {c}")))
            } else {
                Ok(value)
            }
        };
        let objective = RefCell::new(guarded);
        let counter = Cell::new(0);
        let res = Executor::new(
            ScalarCost::new(&objective, &counter),
            BrentRoot::new(lo, hi, self.xtol),
        )
        .configure(|state| state.max_iters(self.max_iterations as u64))
        .run()
        .map_err(|e| from_argmin(e, |reason| Error::root_not_found(side, reason)))?;

        let state = res.state();
        let iterations = state.get_iter() as usize;
        if !converged(state.get_termination_status()) {
            return Err(Error::root_not_found(
                side,
                format!("no convergence within {} iterations", self.max_iterations),
            ));
        }
        let root = state.get_best_param().copied().unwrap_or(outside);
        debug!(%side, root, iteration = iterations, evaluations = counter.get(), "Root converged");
        Ok(RootResult { root, iterations })
    }
}
