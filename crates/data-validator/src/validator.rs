//! Trajectory and Column Validation

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Expected first cycle of every unit
    pub first_cycle: u32,
    /// Log skipped cycles as warnings
    pub warn_on_gaps: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            first_cycle: 1,
            warn_on_gaps: true,
        }
    }
}

/// A run of missing cycles inside a trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleGap {
    /// Last cycle present before the gap
    pub after: u32,
    /// First cycle present after the gap
    pub before: u32,
}

impl CycleGap {
    /// Number of cycles missing from the gap
    pub fn missing(&self) -> u32 {
        self.before - self.after - 1
    }
}

/// Outcome of validating one unit trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryReport {
    /// Unit identifier
    pub unit: u32,
    /// Number of cycles in the trajectory
    pub len: usize,
    /// Whether the first cycle matches the configured start
    pub starts_at_first_cycle: bool,
    /// Skipped cycles; labels are still computed from max(cycles)
    pub gaps: Vec<CycleGap>,
}

impl TrajectoryReport {
    /// Whether the trajectory is contiguous from the configured first cycle
    pub fn is_contiguous(&self) -> bool {
        self.starts_at_first_cycle && self.gaps.is_empty()
    }
}

/// Validator for unit trajectories and feature column sets
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate the cycle sequence of one unit.
    ///
    /// Empty and non-increasing sequences are errors. Gaps and a late start are
    /// reported but tolerated.
    pub fn validate_cycles(
        &self,
        unit: u32,
        cycles: &[u32],
    ) -> Result<TrajectoryReport, ValidationError> {
        let first = *cycles.first().ok_or(ValidationError::EmptyGroup { unit })?;

        let mut gaps = Vec::new();
        for pair in cycles.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            if current <= previous {
                return Err(ValidationError::NonIncreasingCycles {
                    unit,
                    previous,
                    current,
                });
            }
            if current - previous > 1 {
                gaps.push(CycleGap {
                    after: previous,
                    before: current,
                });
            }
        }

        let report = TrajectoryReport {
            unit,
            len: cycles.len(),
            starts_at_first_cycle: first == self.config.first_cycle,
            gaps,
        };

        if self.config.warn_on_gaps && !report.is_contiguous() {
            warn!(
                "Unit {} is not contiguous (first cycle {}, {} gaps); RUL uses max(cycles) as-is",
                unit,
                first,
                report.gaps.len()
            );
        }

        Ok(report)
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Reject duplicated column names
    pub fn validate_unique_columns(&self, columns: &[String]) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for name in columns {
            if !seen.insert(name.as_str()) {
                return Err(ValidationError::DuplicateColumn(name.clone()));
            }
        }
        Ok(())
    }

    /// Check that every required column is present
    pub fn validate_present<S: AsRef<str>>(
        &self,
        columns: &[String],
        required: &[S],
    ) -> Result<(), ValidationError> {
        for name in required {
            let name = name.as_ref();
            if !columns.iter().any(|c| c == name) {
                return Err(ValidationError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

/// Check that two feature column lists agree in name and order
pub fn check_alignment(expected: &[String], actual: &[String]) -> Result<(), ValidationError> {
    let len = expected.len().max(actual.len());
    for position in 0..len {
        let e = expected.get(position);
        let a = actual.get(position);
        if e != a {
            return Err(ValidationError::Misaligned {
                position,
                expected: e.cloned(),
                actual: a.cloned(),
            });
        }
    }
    debug!("Feature columns aligned ({} columns)", len);
    Ok(())
}
