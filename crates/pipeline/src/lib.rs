//! Turbofan RUL Pipeline
//!
//! Explicit entry point for the batch run: load one sub-fleet, build the
//! lagged feature matrices, fit OLS on clipped RUL, evaluate, and persist the
//! model artifact and run report.

mod config;
mod report;
mod runner;

pub use config::{PipelineConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use report::{PipelineReport, UnitPrediction};
pub use runner::Pipeline;

use cmapss_data::DataError;
use data_validator::ValidationError;
use rul_model::ModelError;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("No true RUL for test unit {unit}")]
    MissingTrueRul { unit: u32 },
    #[error("Failed to write report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Report encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Initialize logging; `RUST_LOG` overrides `default_level`
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        warn!("Tracing subscriber already installed");
    }
}
