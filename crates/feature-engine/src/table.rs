//! Column-Oriented Sensor Table

use crate::statistics::ColumnStats;
use cmapss_data::{value_column_names, SubFleet, UnitTrajectory};
use data_validator::{ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Row index of a table: never a feature column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowKey {
    pub sub_fleet: SubFleet,
    pub unit_number: u32,
    pub cycles: u32,
}

impl RowKey {
    fn unit(&self) -> (SubFleet, u32) {
        (self.sub_fleet, self.unit_number)
    }
}

/// Contiguous block of rows belonging to one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitBlock {
    pub sub_fleet: SubFleet,
    pub unit_number: u32,
    pub rows: Range<usize>,
}

/// Immutable table of f64 columns keyed by (sub-fleet, unit, cycle).
///
/// Rows are ordered by key, so each unit occupies one contiguous block with
/// cycles ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorTable {
    keys: Vec<RowKey>,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl SensorTable {
    /// Build a table from keys and named columns
    pub fn new(
        keys: Vec<RowKey>,
        names: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, ValidationError> {
        Validator::default().validate_unique_columns(&names)?;
        for (name, values) in names.iter().zip(&columns) {
            if values.len() != keys.len() {
                return Err(ValidationError::LengthMismatch {
                    column: name.clone(),
                    expected: keys.len(),
                    actual: values.len(),
                });
            }
        }
        if let Some(row) = keys.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(ValidationError::UnsortedRows { row: row + 1 });
        }
        Ok(Self {
            keys,
            names,
            columns,
        })
    }

    /// Table of settings and sensors from validated trajectories
    pub fn from_trajectories(trajectories: &[UnitTrajectory]) -> Result<Self, ValidationError> {
        let names = value_column_names();
        let rows: usize = trajectories.iter().map(|t| t.len()).sum();

        let mut keyed: Vec<(RowKey, usize, usize)> = Vec::with_capacity(rows);
        for (t_idx, trajectory) in trajectories.iter().enumerate() {
            if trajectory.is_empty() {
                return Err(ValidationError::EmptyGroup {
                    unit: trajectory.unit_number,
                });
            }
            for (r_idx, record) in trajectory.records().iter().enumerate() {
                keyed.push((
                    RowKey {
                        sub_fleet: trajectory.sub_fleet,
                        unit_number: trajectory.unit_number,
                        cycles: record.cycles,
                    },
                    t_idx,
                    r_idx,
                ));
            }
        }
        keyed.sort_by_key(|(key, _, _)| *key);

        let mut columns = vec![Vec::with_capacity(rows); names.len()];
        for (_, t_idx, r_idx) in &keyed {
            let record = &trajectories[*t_idx].records()[*r_idx];
            for (c_idx, column) in columns.iter_mut().enumerate() {
                column.push(record.value(c_idx));
            }
        }
        let keys = keyed.into_iter().map(|(key, _, _)| key).collect();

        Self::new(keys, names, columns)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Row keys in table order
    pub fn keys(&self) -> &[RowKey] {
        &self.keys
    }

    /// Column names in table order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Values of a named column
    pub fn column(&self, name: &str) -> Result<&[f64], ValidationError> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| ValidationError::MissingColumn(name.to_string()))
    }

    /// Append a column
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(ValidationError::DuplicateColumn(name));
        }
        if values.len() != self.len() {
            return Err(ValidationError::LengthMismatch {
                column: name,
                expected: self.len(),
                actual: values.len(),
            });
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(self)
    }

    /// Remove a column, returning the table and the column's values
    pub fn take_column(mut self, name: &str) -> Result<(Self, Vec<f64>), ValidationError> {
        let idx = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| ValidationError::MissingColumn(name.to_string()))?;
        self.names.remove(idx);
        let values = self.columns.remove(idx);
        Ok((self, values))
    }

    /// Copy of the table without the named columns; every name must exist
    pub fn without_columns<S: AsRef<str>>(&self, drop: &[S]) -> Result<Self, ValidationError> {
        Validator::default().validate_present(&self.names, drop)?;
        let (names, columns) = self
            .names
            .iter()
            .zip(&self.columns)
            .filter(|(name, _)| !drop.iter().any(|d| d.as_ref() == name.as_str()))
            .map(|(name, values)| (name.clone(), values.clone()))
            .unzip();
        Ok(Self {
            keys: self.keys.clone(),
            names,
            columns,
        })
    }

    /// Keep only rows whose mask entry is true
    pub fn retain_rows(&self, keep: &[bool]) -> Self {
        let select = |values: &[f64]| -> Vec<f64> {
            values
                .iter()
                .zip(keep)
                .filter(|(_, &k)| k)
                .map(|(&v, _)| v)
                .collect()
        };
        Self {
            keys: self
                .keys
                .iter()
                .zip(keep)
                .filter(|(_, &k)| k)
                .map(|(&key, _)| key)
                .collect(),
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| select(c.as_slice())).collect(),
        }
    }

    /// Contiguous per-unit row ranges, in table order
    pub fn unit_blocks(&self) -> Vec<UnitBlock> {
        let mut blocks: Vec<UnitBlock> = Vec::new();
        for (idx, key) in self.keys.iter().enumerate() {
            match blocks.last_mut() {
                Some(block) if (block.sub_fleet, block.unit_number) == key.unit() => {
                    block.rows.end = idx + 1;
                }
                _ => blocks.push(UnitBlock {
                    sub_fleet: key.sub_fleet,
                    unit_number: key.unit_number,
                    rows: idx..idx + 1,
                }),
            }
        }
        blocks
    }

    /// Summary statistics for every column
    pub fn describe(&self) -> Vec<(String, ColumnStats)> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, values)| (name.clone(), ColumnStats::compute(values)))
            .collect()
    }
}
