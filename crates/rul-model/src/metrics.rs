//! Regression Metrics

use crate::ModelError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Goodness-of-fit summary for a set of predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Root mean squared error
    pub rmse: f64,
    /// Coefficient of determination; negative when worse than the mean
    pub r2: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Number of samples
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Compute metrics from equal-length true and predicted values
    pub fn compute(y_true: &[f64], y_hat: &[f64]) -> Result<Self, ModelError> {
        if y_true.len() != y_hat.len() {
            return Err(ModelError::DimensionMismatch {
                expected: y_true.len(),
                actual: y_hat.len(),
            });
        }
        if y_true.is_empty() {
            return Err(ModelError::EmptyInput);
        }

        let n = y_true.len() as f64;
        let mean = y_true.iter().sum::<f64>() / n;
        let ss_res: f64 = y_true
            .iter()
            .zip(y_hat)
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
        let abs_err: f64 = y_true.iter().zip(y_hat).map(|(t, p)| (t - p).abs()).sum();

        // constant truth: perfect predictions score 1, anything else 0
        let r2 = if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };

        Ok(Self {
            rmse: (ss_res / n).sqrt(),
            r2,
            mae: abs_err / n,
            n_samples: y_true.len(),
        })
    }
}

/// Compute and log metrics for a labeled set of predictions
pub fn evaluate(
    y_true: &[f64],
    y_hat: &[f64],
    label: &str,
) -> Result<RegressionMetrics, ModelError> {
    let metrics = RegressionMetrics::compute(y_true, y_hat)?;
    info!("{} set RMSE:{}, R2:{}", label, metrics.rmse, metrics.r2);
    Ok(metrics)
}
