//! Validation Error Types

use thiserror::Error;

/// Errors raised while validating trajectories and tables
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A column expected by configuration is absent from the table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A column name appears twice
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A unit trajectory has no rows
    #[error("Unit {unit} has an empty trajectory")]
    EmptyGroup { unit: u32 },

    /// Cycles within a unit are not strictly increasing
    #[error("Unit {unit}: cycle {current} does not follow cycle {previous}")]
    NonIncreasingCycles { unit: u32, previous: u32, current: u32 },

    /// Table rows are not ordered by (sub-fleet, unit, cycle)
    #[error("Row {row} is out of (sub-fleet, unit, cycle) order")]
    UnsortedRows { row: usize },

    /// Column length differs from the table's row count
    #[error("Column {column} has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Training and inference feature columns disagree
    #[error("Feature columns misaligned at position {position}: expected {expected:?}, got {actual:?}")]
    Misaligned {
        position: usize,
        expected: Option<String>,
        actual: Option<String>,
    },
}
