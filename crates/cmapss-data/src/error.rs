//! Data Loading Error Types

use data_validator::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading C-MAPSS files
#[derive(Debug, Error)]
pub enum DataError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stream error without an associated path
    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    /// Line has the wrong number of fields
    #[error("Line {line}: expected {expected} fields, got {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// Field is not a valid number
    #[error("Line {line}: field {field} has invalid value {value:?}")]
    ParseField {
        line: usize,
        field: usize,
        value: String,
    },

    /// Sub-fleet code not recognised
    #[error("Unknown sub-fleet: {0}")]
    UnknownSubFleet(String),

    /// Trajectory failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
