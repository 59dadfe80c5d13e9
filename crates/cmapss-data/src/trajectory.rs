//! Unit Trajectories

use crate::{CycleRecord, DataError, SubFleet};
use data_validator::{TrajectoryReport, Validator};
use std::collections::BTreeMap;
use tracing::debug;

/// Cycle records of one unit, ordered by cycle
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTrajectory {
    pub sub_fleet: SubFleet,
    pub unit_number: u32,
    records: Vec<CycleRecord>,
}

impl UnitTrajectory {
    /// Build a trajectory, sorting by cycle and validating strict increase
    pub fn new(
        sub_fleet: SubFleet,
        unit_number: u32,
        mut records: Vec<CycleRecord>,
        validator: &Validator,
    ) -> Result<(Self, TrajectoryReport), DataError> {
        records.sort_by_key(|r| r.cycles);
        let cycles: Vec<u32> = records.iter().map(|r| r.cycles).collect();
        let report = validator.validate_cycles(unit_number, &cycles)?;
        Ok((
            Self {
                sub_fleet,
                unit_number,
                records,
            },
            report,
        ))
    }

    /// Records in cycle order
    pub fn records(&self) -> &[CycleRecord] {
        &self.records
    }

    /// Number of cycles
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a validated trajectory
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Last recorded cycle
    pub fn last_cycle(&self) -> Option<u32> {
        self.records.last().map(|r| r.cycles)
    }
}

/// Partition records by unit, ascending unit order, each sorted by cycle
pub fn group_trajectories(
    sub_fleet: SubFleet,
    records: Vec<CycleRecord>,
    validator: &Validator,
) -> Result<Vec<UnitTrajectory>, DataError> {
    let mut by_unit: BTreeMap<u32, Vec<CycleRecord>> = BTreeMap::new();
    for record in records {
        by_unit.entry(record.unit_number).or_default().push(record);
    }

    let mut trajectories = Vec::with_capacity(by_unit.len());
    let mut non_contiguous = 0;
    for (unit, unit_records) in by_unit {
        let (trajectory, report) = UnitTrajectory::new(sub_fleet, unit, unit_records, validator)?;
        if !report.is_contiguous() {
            non_contiguous += 1;
        }
        trajectories.push(trajectory);
    }

    debug!(
        "{}: grouped {} trajectories ({} non-contiguous)",
        sub_fleet,
        trajectories.len(),
        non_contiguous
    );
    Ok(trajectories)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(unit: u32, cycle: u32) -> CycleRecord {
        CycleRecord {
            unit_number: unit,
            cycles: cycle,
            ..Default::default()
        }
    }

    #[test]
    fn test_grouping_sorts_units_and_cycles() {
        let records = vec![record(2, 2), record(1, 2), record(2, 1), record(1, 1), record(1, 3)];
        let groups = group_trajectories(SubFleet::FD001, records, &Validator::default()).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].unit_number, 1);
        let cycles: Vec<u32> = groups[0].records().iter().map(|r| r.cycles).collect();
        assert_eq!(cycles, vec![1, 2, 3]);
        assert_eq!(groups[1].last_cycle(), Some(2));
    }

    #[test]
    fn test_duplicate_cycle_is_error() {
        let records = vec![record(1, 1), record(1, 1)];
        let result = group_trajectories(SubFleet::FD001, records, &Validator::default());
        assert!(matches!(result, Err(DataError::Validation(_))));
    }
}
