//! Pipeline configuration

use crate::PipelineError;
use cmapss_data::SubFleet;
use data_validator::ValidationConfig;
use config::{Config, Environment, File, Source};
use feature_engine::FeatureConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file read when no path is given, if present
pub const DEFAULT_CONFIG_FILE: &str = "rul-pipeline.toml";

/// Prefix of environment overrides, e.g. `RUL_DATA_DIR`, `RUL_FEATURES__RUL_CEILING`
pub const ENV_PREFIX: &str = "RUL";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding `train_FD00x.txt`, `test_FD00x.txt`, `RUL_FD00x.txt`
    pub data_dir: PathBuf,
    /// Sub-fleet to train and evaluate on
    pub sub_fleet: SubFleet,
    /// Where the fitted model is written
    pub artifact_path: PathBuf,
    /// Optional JSON run report
    pub report_path: Option<PathBuf>,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Spread below which a raw column is logged as a drop candidate
    pub constant_tolerance: f64,
    /// Trajectory cycle checks applied while loading
    pub validation: ValidationConfig,
    /// Feature construction
    pub features: FeatureConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/raw/CMAPSSData_small"),
            sub_fleet: SubFleet::FD001,
            artifact_path: PathBuf::from("models/timeseries_regression_pipeline.bin"),
            report_path: None,
            log_level: "info".to_string(),
            constant_tolerance: 1e-6,
            validation: ValidationConfig::default(),
            features: FeatureConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Layer defaults, a TOML file, and `RUL_*` environment overrides.
    ///
    /// An explicit `path` must exist; otherwise [`DEFAULT_CONFIG_FILE`] is
    /// read only if present.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Self::from_sources(file, environment())
    }

    fn from_sources<S>(file: S, env: Environment) -> Result<Self, PipelineError>
    where
        S: Source + Send + Sync + 'static,
    {
        let config: Self = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
