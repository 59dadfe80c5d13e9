//! Ordinary Least Squares Regression

use crate::ModelError;
use data_validator::check_alignment;
use feature_engine::FeatureMatrix;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Squared residual norm, relative to a standardized column, below which a
/// column counts as a linear combination of the preceding ones
const RANK_TOLERANCE: f64 = 1e-10;

/// Linear model `y = intercept + Σ coefficients[j] * x[j]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Build a model from known parameters
    pub fn from_parts(
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, ModelError> {
        if feature_names.len() != coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: feature_names.len(),
                actual: coefficients.len(),
            });
        }
        Ok(Self {
            feature_names,
            coefficients,
            intercept,
        })
    }

    /// Fit on a training matrix using its target column
    pub fn fit(matrix: &FeatureMatrix) -> Result<Self, ModelError> {
        let target = matrix.target().ok_or(ModelError::MissingTarget)?;
        Self::fit_arrays(
            matrix.values().view(),
            target.view(),
            matrix.columns().to_vec(),
        )
    }

    /// Fit with intercept, minimizing squared error.
    ///
    /// Columns are centered and scaled to unit norm, then the normal equations
    /// are solved by Cholesky factorization. A column that is (numerically) a
    /// linear combination of earlier columns gets a zero coefficient; fitted
    /// values are the same as for any other least-squares solution.
    pub fn fit_arrays(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        feature_names: Vec<String>,
    ) -> Result<Self, ModelError> {
        let (n, p) = x.dim();
        if n != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: n,
                actual: y.len(),
            });
        }
        if p != feature_names.len() {
            return Err(ModelError::DimensionMismatch {
                expected: p,
                actual: feature_names.len(),
            });
        }
        let x_mean = x.mean_axis(Axis(0)).ok_or(ModelError::EmptyInput)?;
        let y_mean = y.mean().ok_or(ModelError::EmptyInput)?;

        let centered = &x - &x_mean;
        let norms = centered.map_axis(Axis(0), |col| col.dot(&col).sqrt());
        let y_centered = y.mapv(|v| v - y_mean);

        // zero-variance columns carry no signal and stay at zero weight
        let varying: Vec<usize> = (0..p)
            .filter(|&j| norms[j] > RANK_TOLERANCE * (1.0 + x_mean[j].abs()) * (n as f64).sqrt())
            .collect();

        let mut z = Array2::<f64>::zeros((n, varying.len()));
        for (k, &j) in varying.iter().enumerate() {
            z.column_mut(k).assign(&(&centered.column(j) / norms[j]));
        }
        let gram = z.t().dot(&z);
        let rhs = z.t().dot(&y_centered);

        let (gamma, dependent) = cholesky_solve(&gram, &rhs);

        let mut coefficients = vec![0.0; p];
        for (k, &j) in varying.iter().enumerate() {
            coefficients[j] = gamma[k] / norms[j];
        }
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(x_mean.iter())
                .map(|(b, m)| b * m)
                .sum::<f64>();

        let zero_weight = p - varying.len() + dependent.len();
        if zero_weight > 0 {
            let names: Vec<&str> = (0..p)
                .filter(|&j| coefficients[j] == 0.0)
                .map(|j| feature_names[j].as_str())
                .collect();
            warn!(
                "{} constant or collinear features get zero weight: {:?}",
                zero_weight, names
            );
        }
        info!("Fitted OLS on {} rows x {} features", n, p);

        Ok(Self {
            feature_names,
            coefficients,
            intercept,
        })
    }

    /// Predict a feature matrix whose columns match the training columns
    pub fn predict(&self, matrix: &FeatureMatrix) -> Result<Array1<f64>, ModelError> {
        check_alignment(&self.feature_names, matrix.columns())?;
        self.predict_array(matrix.values().view())
    }

    /// Predict raw feature rows in training column order
    pub fn predict_array(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        if x.ncols() != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: x.ncols(),
            });
        }
        let beta = ArrayView1::from(self.coefficients.as_slice());
        let predictions = x.dot(&beta) + self.intercept;
        debug!("Predicted {} rows", predictions.len());
        Ok(predictions)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Solve `a x = b` for symmetric positive semi-definite `a` with unit diagonal.
///
/// Returns the solution and the indices treated as linearly dependent, whose
/// entries are zero.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> (Array1<f64>, Vec<usize>) {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));
    let mut independent = Vec::with_capacity(n);
    let mut dependent = Vec::new();

    for i in 0..n {
        let pivot = a[[i, i]] - independent.iter().map(|&m| l[[i, m]] * l[[i, m]]).sum::<f64>();
        if pivot <= RANK_TOLERANCE {
            dependent.push(i);
            continue;
        }
        let diag = pivot.sqrt();
        l[[i, i]] = diag;
        for j in (i + 1)..n {
            let dot: f64 = independent.iter().map(|&m| l[[j, m]] * l[[i, m]]).sum();
            l[[j, i]] = (a[[j, i]] - dot) / diag;
        }
        independent.push(i);
    }

    // L z = b
    let mut z = Array1::<f64>::zeros(n);
    for (pos, &i) in independent.iter().enumerate() {
        let dot: f64 = independent[..pos].iter().map(|&m| l[[i, m]] * z[m]).sum();
        z[i] = (b[i] - dot) / l[[i, i]];
    }

    // Lᵀ x = z
    let mut x = Array1::<f64>::zeros(n);
    for (pos, &i) in independent.iter().enumerate().rev() {
        let dot: f64 = independent[pos + 1..].iter().map(|&m| l[[m, i]] * x[m]).sum();
        x[i] = (z[i] - dot) / l[[i, i]];
    }

    (x, dependent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    fn names(p: usize) -> Vec<String> {
        (0..p).map(|j| format!("x{}", j)).collect()
    }

    fn design(n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, 2), |(i, j)| match j {
            0 => i as f64,
            _ => ((i * i) % 7) as f64,
        })
    }

    #[test]
    fn test_recovers_exact_coefficients() {
        let x = design(30);
        let y: Array1<f64> = x.rows().into_iter().map(|r| 3.0 + 2.0 * r[0] - 0.5 * r[1]).collect();

        let model = LinearRegression::fit_arrays(x.view(), y.view(), names(2)).unwrap();
        assert!((model.intercept() - 3.0).abs() < 1e-8);
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-8);
        assert!((model.coefficients()[1] + 0.5).abs() < 1e-8);

        let predictions = model.predict_array(x.view()).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-8);
        }
    }

    #[test]
    fn test_constant_column_zero_weight() {
        let x = Array2::from_shape_fn((10, 2), |(i, j)| if j == 0 { i as f64 } else { 42.0 });
        let y: Array1<f64> = (0..10).map(|i| 1.0 + i as f64).collect();

        let model = LinearRegression::fit_arrays(x.view(), y.view(), names(2)).unwrap();
        assert_eq!(model.coefficients()[1], 0.0);
        assert!((model.coefficients()[0] - 1.0).abs() < 1e-9);
        assert!((model.intercept() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_columns_still_fit() {
        let x = Array2::from_shape_fn((12, 3), |(i, j)| match j {
            0 => i as f64,
            1 => 2.0 * i as f64 + 5.0,
            _ => ((i * 3) % 5) as f64,
        });
        let y: Array1<f64> = x.rows().into_iter().map(|r| 4.0 * r[0] + r[2]).collect();

        let model = LinearRegression::fit_arrays(x.view(), y.view(), names(3)).unwrap();
        assert_eq!(model.coefficients()[1], 0.0);
        let predictions = model.predict_array(x.view()).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-7);
        }
    }

    #[test]
    fn test_dimension_errors() {
        let x = design(5);
        let y = array![1.0, 2.0, 3.0];
        assert!(matches!(
            LinearRegression::fit_arrays(x.view(), y.view(), names(2)),
            Err(ModelError::DimensionMismatch { expected: 5, actual: 3 })
        ));

        let empty = Array2::<f64>::zeros((0, 2));
        let no_y = Array1::<f64>::zeros(0);
        assert!(matches!(
            LinearRegression::fit_arrays(empty.view(), no_y.view(), names(2)),
            Err(ModelError::EmptyInput)
        ));

        let model = LinearRegression::from_parts(names(2), vec![1.0, 1.0], 0.0).unwrap();
        let wide = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            model.predict_array(wide.view()),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_fit_requires_target() {
        use cmapss_data::SubFleet;
        use feature_engine::{RowKey, SensorTable};

        let key = |c| RowKey {
            sub_fleet: SubFleet::FD001,
            unit_number: 1,
            cycles: c,
        };
        let table =
            SensorTable::new(vec![key(1), key(2)], vec!["a".to_string()], vec![vec![1.0, 2.0]])
                .unwrap();
        let matrix = FeatureMatrix::from_table(table, None).unwrap();
        assert!(matches!(
            LinearRegression::fit(&matrix),
            Err(ModelError::MissingTarget)
        ));
    }

    #[test]
    fn test_predict_rejects_misaligned_columns() {
        use cmapss_data::SubFleet;
        use feature_engine::{RowKey, SensorTable};

        let key = |c| RowKey {
            sub_fleet: SubFleet::FD001,
            unit_number: 1,
            cycles: c,
        };
        let table = SensorTable::new(
            vec![key(1), key(2)],
            vec!["x1".to_string(), "x0".to_string()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        )
        .unwrap();
        let matrix = FeatureMatrix::from_table(table, None).unwrap();
        let model = LinearRegression::from_parts(names(2), vec![1.0, 1.0], 0.0).unwrap();

        assert!(matches!(
            model.predict(&matrix),
            Err(ModelError::Misaligned(_))
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_residuals_have_zero_mean(
            rows in prop::collection::vec(
                (-100.0f64..100.0, -100.0f64..100.0, -50.0f64..50.0),
                5..40,
            )
        ) {
            let n = rows.len();
            let x = Array2::from_shape_fn((n, 2), |(i, j)| {
                if j == 0 {
                    rows[i].0
                } else {
                    rows[i].1
                }
            });
            let y: Array1<f64> = rows.iter().map(|r| r.2).collect();
            let model = LinearRegression::fit_arrays(
                x.view(),
                y.view(),
                vec!["a".to_string(), "b".to_string()],
            ).unwrap();

            let residuals = &y - &model.predict_array(x.view()).unwrap();
            let mean = residuals.sum() / n as f64;
            prop_assert!(mean.abs() < 1e-6);
        }
    }
}
