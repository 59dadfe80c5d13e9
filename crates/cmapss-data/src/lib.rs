//! C-MAPSS Turbofan Data
//!
//! Cycle records for the four sub-fleets, unit trajectories, and loading of
//! the whitespace-delimited train/test/RUL text files.

mod error;
mod loader;
mod trajectory;

pub use error::DataError;
pub use loader::{parse_cycle_log, parse_rul_file, DatasetLoader, SubFleetData};
pub use trajectory::{group_trajectories, UnitTrajectory};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of operational setting columns
pub const SETTING_COUNT: usize = 3;

/// Number of sensor columns
pub const SENSOR_COUNT: usize = 21;

/// Number of whitespace-separated fields per log line
pub const FIELD_COUNT: usize = 2 + SETTING_COUNT + SENSOR_COUNT;

/// One of the four C-MAPSS dataset partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubFleet {
    /// One operating condition, one fault mode
    FD001,
    /// Six operating conditions, one fault mode
    FD002,
    /// One operating condition, two fault modes
    FD003,
    /// Six operating conditions, two fault modes
    FD004,
}

impl SubFleet {
    /// All sub-fleets in dataset order
    pub const ALL: [SubFleet; 4] = [
        SubFleet::FD001,
        SubFleet::FD002,
        SubFleet::FD003,
        SubFleet::FD004,
    ];

    /// Uppercase code used in file names
    pub fn code(&self) -> &'static str {
        match self {
            SubFleet::FD001 => "FD001",
            SubFleet::FD002 => "FD002",
            SubFleet::FD003 => "FD003",
            SubFleet::FD004 => "FD004",
        }
    }

    /// Lowercase tag used in reports
    pub fn tag(&self) -> &'static str {
        match self {
            SubFleet::FD001 => "fd001",
            SubFleet::FD002 => "fd002",
            SubFleet::FD003 => "fd003",
            SubFleet::FD004 => "fd004",
        }
    }
}

impl fmt::Display for SubFleet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SubFleet {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubFleet::ALL
            .into_iter()
            .find(|fleet| fleet.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| DataError::UnknownSubFleet(s.to_string()))
    }
}

/// Train or test partition of a sub-fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Split {
    /// Run-to-failure trajectories
    Train,
    /// Trajectories truncated before failure
    Test,
}

impl Split {
    /// File name prefix for this split
    pub fn prefix(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

/// One engine log row for a (sub-fleet, unit, cycle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub unit_number: u32,
    pub cycles: u32,
    pub settings: [f64; SETTING_COUNT],
    pub sensors: [f64; SENSOR_COUNT],
}

impl CycleRecord {
    /// Value of the column at `index` in [`value_column_names`] order
    pub fn value(&self, index: usize) -> f64 {
        if index < SETTING_COUNT {
            self.settings[index]
        } else {
            self.sensors[index - SETTING_COUNT]
        }
    }
}

impl Default for CycleRecord {
    fn default() -> Self {
        Self {
            unit_number: 0,
            cycles: 0,
            settings: [0.0; SETTING_COUNT],
            sensors: [0.0; SENSOR_COUNT],
        }
    }
}

/// Setting column name, 1-based
pub fn setting_name(index: usize) -> String {
    format!("operational_setting_{}", index)
}

/// Sensor column name, 1-based
pub fn sensor_name(index: usize) -> String {
    format!("sensor{}", index)
}

/// Names of the value columns of a record: settings then sensors
pub fn value_column_names() -> Vec<String> {
    (1..=SETTING_COUNT)
        .map(setting_name)
        .chain((1..=SENSOR_COUNT).map(sensor_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        let names = value_column_names();
        assert_eq!(names.len(), SETTING_COUNT + SENSOR_COUNT);
        assert_eq!(names[0], "operational_setting_1");
        assert_eq!(names[3], "sensor1");
        assert_eq!(names[23], "sensor21");
    }

    #[test]
    fn test_record_value_index() {
        let mut record = CycleRecord::default();
        record.settings[2] = 100.0;
        record.sensors[0] = 518.67;
        assert_eq!(record.value(2), 100.0);
        assert_eq!(record.value(3), 518.67);
    }

    #[test]
    fn test_sub_fleet_parse() {
        assert_eq!("FD003".parse::<SubFleet>().unwrap(), SubFleet::FD003);
        assert_eq!("fd001".parse::<SubFleet>().unwrap(), SubFleet::FD001);
        assert!("FD005".parse::<SubFleet>().is_err());
        assert_eq!(SubFleet::FD002.to_string(), "fd002");
    }
}
