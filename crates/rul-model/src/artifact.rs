//! Persisted Model Artifact

use crate::model::LinearRegression;
use crate::ModelError;
use cmapss_data::SubFleet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Current artifact layout version
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Fitted model with the sub-fleet it was trained on, stored as postcard bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub sub_fleet: SubFleet,
    pub model: LinearRegression,
}

impl ModelArtifact {
    /// Wrap a fitted model
    pub fn new(sub_fleet: SubFleet, model: LinearRegression) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            sub_fleet,
            model,
        }
    }

    /// Encode to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        postcard::to_allocvec(self).map_err(|e| ModelError::Encoding(e.to_string()))
    }

    /// Decode from bytes, rejecting other layout versions
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        let artifact: Self =
            postcard::from_bytes(bytes).map_err(|e| ModelError::Encoding(e.to_string()))?;
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: artifact.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }
        Ok(artifact)
    }

    /// Write to `path`, creating parent directories and replacing any previous artifact
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let io_err = |source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes).map_err(io_err)?;
        info!(
            "Saved {} model ({} features, {} bytes) to {}",
            self.sub_fleet,
            self.model.feature_names().len(),
            bytes.len(),
            path.display()
        );
        Ok(())
    }

    /// Read from `path`
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let bytes = fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::from_bytes(&bytes)?;
        info!("Loaded {} model from {}", artifact.sub_fleet, path.display());
        Ok(artifact)
    }
}
