//! RUL Labeling and Clipping

use crate::config::{CLIPPED_RUL_COLUMN, RUL_COLUMN};
use crate::table::SensorTable;
use data_validator::ValidationError;
use tracing::debug;

/// RUL for every cycle of one unit: `max(cycles) - cycles`.
///
/// Assumes linear degradation to end of life. Skipped cycles are not detected
/// here; the label only depends on the last recorded cycle.
pub fn label_trajectory(unit: u32, cycles: &[u32]) -> Result<Vec<f64>, ValidationError> {
    let last = cycles
        .iter()
        .copied()
        .max()
        .ok_or(ValidationError::EmptyGroup { unit })?;
    Ok(cycles.iter().map(|&c| f64::from(last - c)).collect())
}

/// Append the `rul` column, computed independently per unit
pub fn label_rul(table: SensorTable) -> Result<SensorTable, ValidationError> {
    let mut rul = Vec::with_capacity(table.len());
    let blocks = table.unit_blocks();
    for block in &blocks {
        let cycles: Vec<u32> = table.keys()[block.rows.clone()]
            .iter()
            .map(|k| k.cycles)
            .collect();
        rul.extend(label_trajectory(block.unit_number, &cycles)?);
    }
    debug!("Labeled {} rows across {} units", rul.len(), blocks.len());
    table.with_column(RUL_COLUMN, rul)
}

/// Cap a value at `ceiling`
pub fn clip(value: f64, ceiling: f64) -> f64 {
    value.min(ceiling)
}

/// Append `rul_clipped = min(rul, ceiling)`
pub fn clip_rul(table: SensorTable, ceiling: f64) -> Result<SensorTable, ValidationError> {
    let clipped: Vec<f64> = table
        .column(RUL_COLUMN)?
        .iter()
        .map(|&v| clip(v, ceiling))
        .collect();
    table.with_column(CLIPPED_RUL_COLUMN, clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::trajectory;

    #[test]
    fn test_label_trajectory() {
        assert_eq!(label_trajectory(1, &[1, 2, 3]).unwrap(), vec![2.0, 1.0, 0.0]);
        assert_eq!(
            label_trajectory(5, &[]),
            Err(ValidationError::EmptyGroup { unit: 5 })
        );
    }

    #[test]
    fn test_label_rul_per_unit() {
        let table =
            SensorTable::from_trajectories(&[trajectory(1, &[1, 2, 3]), trajectory(2, &[1, 2])])
                .unwrap();
        let labeled = label_rul(table).unwrap();
        assert_eq!(labeled.column(RUL_COLUMN).unwrap(), &[2.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_gap_uses_max_cycle() {
        let table = SensorTable::from_trajectories(&[trajectory(1, &[1, 2, 5])]).unwrap();
        let labeled = label_rul(table).unwrap();
        assert_eq!(labeled.column(RUL_COLUMN).unwrap(), &[4.0, 3.0, 0.0]);
    }

    #[test]
    fn test_clip_rul() {
        let cycles: Vec<u32> = (1..=200).collect();
        let table = SensorTable::from_trajectories(&[trajectory(1, &cycles)]).unwrap();
        let clipped = clip_rul(label_rul(table).unwrap(), 125.0).unwrap();
        let values = clipped.column(CLIPPED_RUL_COLUMN).unwrap();
        assert_eq!(values[0], 125.0);
        assert_eq!(values[199], 0.0);
        assert_eq!(values[80], 119.0);
    }

    #[test]
    fn test_clip_requires_rul() {
        let table = SensorTable::from_trajectories(&[trajectory(1, &[1, 2])]).unwrap();
        assert_eq!(
            clip_rul(table, 125.0).unwrap_err(),
            ValidationError::MissingColumn(RUL_COLUMN.to_string())
        );
    }
}
