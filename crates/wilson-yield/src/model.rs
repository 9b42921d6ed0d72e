//! Quadratic model of total expected yield
//!
//! Total event yield of a dimension-six operator at linear plus quadratic
//! order is a degree-2 polynomial in the Wilson coefficient. The model is fit
//! by least squares to the summed weight of each reference column and is
//! immutable afterwards.
//!
//! ```text
//! Y(c) = c0 + c1·c + c2·c²
//! ```

use crate::key::KeyCodec;
use crate::table::ReferenceWeightTable;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use wilson_core::{Error, Result};

/// Minimum number of distinct coefficient values for a quadratic fit
pub const MIN_FIT_POINTS: usize = 3;

/// Polynomial coefficients, lowest order first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldModelCoefficients {
    pub constant: f64,
    pub linear: f64,
    pub quadratic: f64,
}

impl YieldModelCoefficients {
    pub fn new(constant: f64, linear: f64, quadratic: f64) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Evaluate the polynomial; extrapolation is not checked
    #[inline]
    pub fn evaluate(&self, coefficient: f64) -> f64 {
        self.constant + coefficient * (self.linear + coefficient * self.quadratic)
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.constant, self.linear, self.quadratic]
    }
}

/// Fitted total-yield model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldModel {
    coefficients: YieldModelCoefficients,
}

impl YieldModel {
    /// Use known coefficients directly
    pub fn from_coefficients(coefficients: YieldModelCoefficients) -> Self {
        Self { coefficients }
    }

    /// Fit from a reference table using `codec` to decode column names
    #[instrument(skip(table, codec), fields(columns = table.len()))]
    pub fn fit(table: &ReferenceWeightTable, codec: &KeyCodec) -> Result<Self> {
        let points = table.points(codec)?;
        Self::fit_points(&points)
    }

    /// Least-squares fit to `(coefficient, yield)` points
    pub fn fit_points(points: &[(f64, f64)]) -> Result<Self> {
        let distinct = count_distinct(points.iter().map(|(x, _)| *x));
        if distinct < MIN_FIT_POINTS {
            return Err(Error::InsufficientData {
                expected: MIN_FIT_POINTS,
                actual: distinct,
            });
        }
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(Error::non_finite("yield model points"));
        }

        let n = points.len();
        let design = DMatrix::from_fn(n, 3, |row, col| points[row].0.powi(col as i32));
        let targets = DVector::from_iterator(n, points.iter().map(|(_, y)| *y));

        let beta = solve_least_squares(&design, &targets).ok_or_else(|| {
            Error::Computation("Yield model design matrix is too ill-conditioned".to_string())
        })?;

        let coefficients = YieldModelCoefficients::new(beta[0], beta[1], beta[2]);
        debug!(
            constant = coefficients.constant,
            linear = coefficients.linear,
            quadratic = coefficients.quadratic,
            "Fitted yield model"
        );
        Ok(Self { coefficients })
    }

    /// Expected total yield at `coefficient`
    #[inline]
    pub fn evaluate(&self, coefficient: f64) -> f64 {
        self.coefficients.evaluate(coefficient)
    }

    pub fn coefficients(&self) -> &YieldModelCoefficients {
        &self.coefficients
    }

    /// Residual sum of squares over `points`
    pub fn residual_sum_of_squares(&self, points: &[(f64, f64)]) -> f64 {
        points
            .iter()
            .map(|(x, y)| (y - self.evaluate(*x)).powi(2))
            .sum()
    }
}

fn count_distinct(values: impl Iterator<Item = f64>) -> usize {
    let mut seen: Vec<f64> = Vec::new();
    for v in values {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen.len()
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_reproduces_co_quadratic_points() {
        let truth = YieldModelCoefficients::new(1000.0, 250.0, 40.0);
        let points: Vec<(f64, f64)> = [-2.0, -1.0, 0.0, 0.5, 1.0, 2.0]
            .iter()
            .map(|&c| (c, truth.evaluate(c)))
            .collect();

        let model = YieldModel::fit_points(&points).unwrap();
        for (c, y) in &points {
            assert_relative_eq!(model.evaluate(*c), *y, max_relative = 1e-9);
        }
        assert_relative_eq!(model.coefficients().quadratic, 40.0, max_relative = 1e-9);
    }

    #[test]
    fn test_fit_is_least_squares_for_noisy_points() {
        let points = vec![(-1.0, 0.9), (0.0, 0.1), (1.0, 1.1), (2.0, 3.9)];
        let model = YieldModel::fit_points(&points).unwrap();

        // Any perturbation of the fitted coefficients must not reduce the residual.
        let best = model.residual_sum_of_squares(&points);
        let c = model.coefficients();
        for delta in [1e-3, -1e-3] {
            let nudged = YieldModel::from_coefficients(YieldModelCoefficients::new(
                c.constant + delta,
                c.linear,
                c.quadratic,
            ));
            assert!(nudged.residual_sum_of_squares(&points) >= best);
        }
    }

    #[test]
    fn test_fit_from_table() {
        let table = ReferenceWeightTable::from_sums([
            ("weight_sm", 100.0),
            ("weight_pos1p0", 130.0),
            ("weight_neg1p0", 90.0),
        ])
        .unwrap();

        let model = YieldModel::fit(&table, &KeyCodec::default()).unwrap();
        assert_relative_eq!(model.evaluate(0.0), 100.0, max_relative = 1e-9);
        assert_relative_eq!(model.evaluate(1.0), 130.0, max_relative = 1e-9);
        assert_relative_eq!(model.evaluate(-1.0), 90.0, max_relative = 1e-9);
    }

    #[test]
    fn test_two_points_is_insufficient() {
        let table =
            ReferenceWeightTable::from_sums([("weight_sm", 100.0), ("weight_pos1p0", 130.0)]).unwrap();

        match YieldModel::fit(&table, &KeyCodec::default()) {
            Err(Error::InsufficientData { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_repeated_coefficient_does_not_count_twice() {
        let points = vec![(0.0, 1.0), (1.0, 2.0), (1.0, 2.1)];
        assert!(matches!(
            YieldModel::fit_points(&points),
            Err(Error::InsufficientData { actual: 2, .. })
        ));
    }

    #[test]
    fn test_extrapolation_is_allowed() {
        let model = YieldModel::from_coefficients(YieldModelCoefficients::new(1.0, 0.0, 1.0));
        assert_relative_eq!(model.evaluate(100.0), 10001.0);
    }
}
