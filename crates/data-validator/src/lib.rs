//! Trajectory and Feature Column Validation
//!
//! Cycle-order checks for unit trajectories, column presence checks, and
//! train/inference feature alignment.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{
    check_alignment, CycleGap, TrajectoryReport, ValidationConfig, Validator,
};
