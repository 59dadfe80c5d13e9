//! RUL Regression Model
//!
//! Ordinary least squares fitting on feature matrices, a persisted model
//! artifact, and regression metrics.

mod artifact;
mod metrics;
mod model;

pub use artifact::{ModelArtifact, ARTIFACT_FORMAT_VERSION};
pub use metrics::{evaluate, RegressionMetrics};
pub use model::LinearRegression;

use data_validator::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during fitting, prediction, evaluation and persistence
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Feature matrix has no target column")]
    MissingTarget,
    #[error("Empty input")]
    EmptyInput,
    #[error(transparent)]
    Misaligned(#[from] ValidationError),
    #[error("Artifact I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Artifact encoding failed: {0}")]
    Encoding(String),
    #[error("Unsupported artifact version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
}
