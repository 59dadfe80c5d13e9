//! Feature Engineering Engine
//!
//! Turns C-MAPSS unit trajectories into supervised-learning tables: RUL
//! labeling, clipping, column selection, and per-unit lag features.

mod config;
mod features;
mod labeler;
mod lag;
mod selector;
mod statistics;
mod table;

pub use config::{FeatureConfig, CLIPPED_RUL_COLUMN, RUL_COLUMN};
pub use features::{FeatureBuilder, FeatureMatrix};
pub use labeler::{clip, clip_rul, label_rul, label_trajectory};
pub use lag::{add_lag_features, lag_column_name};
pub use selector::{remaining_columns, select_features};
pub use statistics::ColumnStats;
pub use table::{RowKey, SensorTable, UnitBlock};

pub use data_validator::ValidationError;
