//! C-MAPSS Text File Loading

use crate::trajectory::{group_trajectories, UnitTrajectory};
use crate::{CycleRecord, DataError, Split, SubFleet, FIELD_COUNT, SENSOR_COUNT, SETTING_COUNT};
use data_validator::Validator;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Parse a whitespace-delimited cycle log
///
/// Each non-blank line holds `unit_number cycles setting_1..3 sensor1..21`.
pub fn parse_cycle_log<R: BufRead>(reader: R) -> Result<Vec<CycleRecord>, DataError> {
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != FIELD_COUNT {
            return Err(DataError::FieldCount {
                line: line_no,
                expected: FIELD_COUNT,
                actual: fields.len(),
            });
        }

        let mut record = CycleRecord {
            unit_number: parse_field(&fields, 0, line_no)?,
            cycles: parse_field(&fields, 1, line_no)?,
            ..Default::default()
        };
        for i in 0..SETTING_COUNT {
            record.settings[i] = parse_field(&fields, 2 + i, line_no)?;
        }
        for i in 0..SENSOR_COUNT {
            record.sensors[i] = parse_field(&fields, 2 + SETTING_COUNT + i, line_no)?;
        }
        records.push(record);
    }

    Ok(records)
}

/// Parse a true-RUL file: line `i` holds the RUL of unit `i`
pub fn parse_rul_file<R: BufRead>(reader: R) -> Result<Vec<u32>, DataError> {
    let mut values = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed.parse::<u32>().map_err(|_| DataError::ParseField {
            line: idx + 1,
            field: 1,
            value: trimmed.to_string(),
        })?;
        values.push(value);
    }
    Ok(values)
}

fn parse_field<T: std::str::FromStr>(
    fields: &[&str],
    index: usize,
    line: usize,
) -> Result<T, DataError> {
    fields[index].parse::<T>().map_err(|_| DataError::ParseField {
        line,
        field: index + 1,
        value: fields[index].to_string(),
    })
}

/// Train and test trajectories of one sub-fleet, with the test split's true RUL
#[derive(Debug, Clone)]
pub struct SubFleetData {
    pub sub_fleet: SubFleet,
    pub train: Vec<UnitTrajectory>,
    pub test: Vec<UnitTrajectory>,
    /// True RUL per test unit; index 0 is unit 1
    pub true_rul: Vec<u32>,
}

impl SubFleetData {
    /// True RUL of a test unit
    pub fn true_rul_for(&self, unit_number: u32) -> Option<u32> {
        let index = usize::try_from(unit_number).ok()?.checked_sub(1)?;
        self.true_rul.get(index).copied()
    }

    /// Whether the true-RUL file has exactly one line per test unit
    pub fn true_rul_matches_test(&self) -> bool {
        self.true_rul.len() == self.test.len()
    }
}

/// Loader for a directory laid out as `train_FD00x.txt`, `test_FD00x.txt`, `RUL_FD00x.txt`
pub struct DatasetLoader {
    root: PathBuf,
    validator: Validator,
}

impl DatasetLoader {
    /// Create a loader rooted at a data directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_validator(root, Validator::default())
    }

    /// Create a loader with a custom trajectory validator
    pub fn with_validator(root: impl Into<PathBuf>, validator: Validator) -> Self {
        let root = root.into();
        info!("Creating dataset loader at {}", root.display());
        Self { root, validator }
    }

    /// Data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a split's cycle log
    pub fn split_path(&self, sub_fleet: SubFleet, split: Split) -> PathBuf {
        self.root.join(format!("{}_{}.txt", split.prefix(), sub_fleet.code()))
    }

    /// Path of a sub-fleet's true-RUL file
    pub fn rul_path(&self, sub_fleet: SubFleet) -> PathBuf {
        self.root.join(format!("RUL_{}.txt", sub_fleet.code()))
    }

    /// Load one split as unit trajectories
    pub fn load_split(
        &self,
        sub_fleet: SubFleet,
        split: Split,
    ) -> Result<Vec<UnitTrajectory>, DataError> {
        let path = self.split_path(sub_fleet, split);
        let records = parse_cycle_log(open(&path)?)?;
        debug!("Read {} rows from {}", records.len(), path.display());
        group_trajectories(sub_fleet, records, &self.validator)
    }

    /// Load the per-unit true RUL of the test split
    pub fn load_true_rul(&self, sub_fleet: SubFleet) -> Result<Vec<u32>, DataError> {
        let path = self.rul_path(sub_fleet);
        parse_rul_file(open(&path)?)
    }

    /// Load train, test and true RUL of one sub-fleet
    pub fn load_sub_fleet(&self, sub_fleet: SubFleet) -> Result<SubFleetData, DataError> {
        let data = SubFleetData {
            sub_fleet,
            train: self.load_split(sub_fleet, Split::Train)?,
            test: self.load_split(sub_fleet, Split::Test)?,
            true_rul: self.load_true_rul(sub_fleet)?,
        };
        info!(
            "Loaded {}: {} train units, {} test units, {} true RUL values",
            sub_fleet,
            data.train.len(),
            data.test.len(),
            data.true_rul.len()
        );
        if !data.true_rul_matches_test() {
            warn!(
                "{}: {} true RUL values for {} test units; files may be mismatched",
                sub_fleet,
                data.true_rul.len(),
                data.test.len()
            );
        }
        Ok(data)
    }

    /// Load all four sub-fleets
    pub fn load_all(&self) -> Result<Vec<SubFleetData>, DataError> {
        SubFleet::ALL
            .iter()
            .map(|&fleet| self.load_sub_fleet(fleet))
            .collect()
    }
}

fn open(path: &Path) -> Result<BufReader<File>, DataError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })
}
