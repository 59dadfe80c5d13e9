//! Feature Matrix Assembly

use crate::config::{FeatureConfig, CLIPPED_RUL_COLUMN};
use crate::labeler::{clip_rul, label_rul};
use crate::lag::add_lag_features;
use crate::selector::{remaining_columns, select_features};
use crate::table::{RowKey, SensorTable};
use cmapss_data::UnitTrajectory;
use data_validator::{check_alignment, ValidationError};
use ndarray::{Array1, Array2};
use tracing::{debug, info};

/// Dense feature matrix with its column names, row keys and optional target
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    keys: Vec<RowKey>,
    columns: Vec<String>,
    values: Array2<f64>,
    target: Option<Array1<f64>>,
}

impl FeatureMatrix {
    /// Materialize a table, popping `target` into the label vector
    pub fn from_table(table: SensorTable, target: Option<&str>) -> Result<Self, ValidationError> {
        let (table, target) = match target {
            Some(name) => {
                let (rest, values) = table.take_column(name)?;
                (rest, Some(Array1::from(values)))
            }
            None => (table, None),
        };

        let columns = table.column_names().to_vec();
        let data = columns
            .iter()
            .map(|name| table.column(name))
            .collect::<Result<Vec<_>, _>>()?;
        let values = Array2::from_shape_fn((table.len(), columns.len()), |(r, c)| data[c][r]);

        Ok(Self {
            keys: table.keys().to_vec(),
            columns,
            values,
            target,
        })
    }

    /// Row keys
    pub fn keys(&self) -> &[RowKey] {
        &self.keys
    }

    /// Feature names in column order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Feature values (rows × features)
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Label vector, present for training sets
    pub fn target(&self) -> Option<&Array1<f64>> {
        self.target.as_ref()
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Index of the last row of every unit, in table order
    pub fn last_row_per_unit(&self) -> Vec<usize> {
        (0..self.keys.len())
            .filter(|&i| {
                self.keys.get(i + 1).map_or(true, |next| {
                    (next.sub_fleet, next.unit_number)
                        != (self.keys[i].sub_fleet, self.keys[i].unit_number)
                })
            })
            .collect()
    }
}

/// Builds training and inference matrices from unit trajectories
pub struct FeatureBuilder {
    config: FeatureConfig,
}

impl FeatureBuilder {
    /// Create a new feature builder
    pub fn new(config: FeatureConfig) -> Self {
        info!(
            "Creating feature builder: ceiling={}, lag={}, dropping {} columns",
            config.rul_ceiling,
            config.lag,
            config.training_drop_list().len()
        );
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Label, clip, select and lag a training split
    pub fn training_table(
        &self,
        trajectories: &[UnitTrajectory],
    ) -> Result<SensorTable, ValidationError> {
        let table = SensorTable::from_trajectories(trajectories)?;
        let table = label_rul(table)?;
        let table = clip_rul(table, self.config.rul_ceiling)?;
        let table = select_features(&table, &self.config.training_drop_list())?;
        let remaining = remaining_columns(&table);
        add_lag_features(&table, &remaining, self.config.lag)
    }

    /// Select and lag an unlabeled split
    pub fn inference_table(
        &self,
        trajectories: &[UnitTrajectory],
    ) -> Result<SensorTable, ValidationError> {
        let table = SensorTable::from_trajectories(trajectories)?;
        let table = select_features(&table, &self.config.inference_drop_list())?;
        let remaining = remaining_columns(&table);
        add_lag_features(&table, &remaining, self.config.lag)
    }

    /// Training matrix with the clipped RUL as target
    pub fn training_set(
        &self,
        trajectories: &[UnitTrajectory],
    ) -> Result<FeatureMatrix, ValidationError> {
        let table = self.training_table(trajectories)?;
        let matrix = FeatureMatrix::from_table(table, Some(CLIPPED_RUL_COLUMN))?;
        debug!(
            "Training set: {} rows x {} features",
            matrix.nrows(),
            matrix.ncols()
        );
        Ok(matrix)
    }

    /// Inference matrix, checked against the training feature columns
    pub fn inference_set(
        &self,
        trajectories: &[UnitTrajectory],
        expected_columns: &[String],
    ) -> Result<FeatureMatrix, ValidationError> {
        let matrix = FeatureMatrix::from_table(self.inference_table(trajectories)?, None)?;
        check_alignment(expected_columns, matrix.columns())?;
        debug!(
            "Inference set: {} rows x {} features",
            matrix.nrows(),
            matrix.ncols()
        );
        Ok(matrix)
    }

    /// Columns of a table whose spread is below `tolerance`
    pub fn drop_candidates(&self, table: &SensorTable, tolerance: f64) -> Vec<String> {
        table
            .describe()
            .into_iter()
            .filter(|(_, stats)| stats.is_near_constant(tolerance))
            .map(|(name, _)| name)
            .collect()
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}
