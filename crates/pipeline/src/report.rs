//! Run Report

use crate::PipelineError;
use cmapss_data::SubFleet;
use rul_model::RegressionMetrics;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prediction at the last observed cycle of a test unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPrediction {
    pub unit_number: u32,
    pub last_cycle: u32,
    pub predicted_rul: f64,
    pub true_rul: u32,
}

/// Summary of one pipeline run, consumed by downstream dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub sub_fleet: SubFleet,
    pub train_units: usize,
    pub train_rows: usize,
    pub test_units: usize,
    pub test_rows: usize,
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub train_metrics: RegressionMetrics,
    /// Absent when no test unit has a retained row
    pub test_metrics: Option<RegressionMetrics>,
    pub unit_predictions: Vec<UnitPrediction>,
    /// Test units dropped entirely by lag generation
    pub skipped_units: Vec<u32>,
    pub artifact_path: PathBuf,
}

impl PipelineReport {
    /// Write as pretty-printed JSON, creating parent directories
    pub fn write_json(&self, path: &Path) -> Result<(), PipelineError> {
        let io_err = |source| PipelineError::Report {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_err)?;
        info!("Wrote run report to {}", path.display());
        Ok(())
    }

    /// Read a report written by [`PipelineReport::write_json`]
    pub fn read_json(path: &Path) -> Result<Self, PipelineError> {
        let json = fs::read_to_string(path).map_err(|source| PipelineError::Report {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
