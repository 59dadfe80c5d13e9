//! Column Selection

use crate::config::{CLIPPED_RUL_COLUMN, RUL_COLUMN};
use crate::table::SensorTable;
use data_validator::ValidationError;
use tracing::debug;

/// Remove exactly the named columns.
///
/// A name absent from the table is a `MissingColumn` error, never skipped, so
/// train and test feature spaces cannot drift apart silently.
pub fn select_features<S: AsRef<str>>(
    table: &SensorTable,
    drop: &[S],
) -> Result<SensorTable, ValidationError> {
    let selected = table.without_columns(drop)?;
    debug!(
        "Dropped {} columns, {} remain",
        drop.len(),
        selected.column_names().len()
    );
    Ok(selected)
}

/// Post-selection columns that get lag features: everything except the RUL
/// labels, sorted by name
pub fn remaining_columns(table: &SensorTable) -> Vec<String> {
    let mut remaining: Vec<String> = table
        .column_names()
        .iter()
        .filter(|name| name.as_str() != RUL_COLUMN && name.as_str() != CLIPPED_RUL_COLUMN)
        .cloned()
        .collect();
    remaining.sort();
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureConfig;
    use crate::labeler::{clip_rul, label_rul};
    use crate::table::tests::trajectory;

    #[test]
    fn test_training_selection() {
        let config = FeatureConfig::default();
        let table = SensorTable::from_trajectories(&[trajectory(1, &[1, 2, 3])]).unwrap();
        let table = clip_rul(label_rul(table).unwrap(), config.rul_ceiling).unwrap();

        let selected = select_features(&table, &config.training_drop_list()).unwrap();
        let names = selected.column_names();
        assert_eq!(names.len(), 15);
        assert_eq!(names.first().map(String::as_str), Some("sensor2"));
        assert_eq!(names.last().map(String::as_str), Some(CLIPPED_RUL_COLUMN));
        assert!(!selected.has_column(RUL_COLUMN));
        assert!(!selected.has_column("sensor1"));
    }

    #[test]
    fn test_inference_selection_rejects_training_list() {
        let config = FeatureConfig::default();
        let table = SensorTable::from_trajectories(&[trajectory(1, &[1, 2])]).unwrap();

        assert!(select_features(&table, &config.inference_drop_list()).is_ok());
        assert_eq!(
            select_features(&table, &config.training_drop_list()).unwrap_err(),
            ValidationError::MissingColumn(RUL_COLUMN.to_string())
        );
    }

    #[test]
    fn test_unknown_column_is_schema_error() {
        let table = SensorTable::from_trajectories(&[trajectory(1, &[1, 2])]).unwrap();
        assert_eq!(
            select_features(&table, &["sensor22"]).unwrap_err(),
            ValidationError::MissingColumn("sensor22".to_string())
        );
    }

    #[test]
    fn test_remaining_columns_sorted() {
        let config = FeatureConfig::default();
        let table = SensorTable::from_trajectories(&[trajectory(1, &[1, 2])]).unwrap();
        let table = clip_rul(label_rul(table).unwrap(), 125.0).unwrap();
        let selected = select_features(&table, &config.training_drop_list()).unwrap();

        let remaining = remaining_columns(&selected);
        assert_eq!(remaining.len(), 14);
        assert_eq!(remaining[0], "sensor11");
        assert_eq!(remaining[13], "sensor9");
        assert!(!remaining.iter().any(|c| c.starts_with("rul")));
    }
}
