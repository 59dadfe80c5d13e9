//! Feature construction configuration

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Name of the raw RUL label column
pub const RUL_COLUMN: &str = "rul";

/// Name of the clipped RUL label column
pub const CLIPPED_RUL_COLUMN: &str = "rul_clipped";

/// Feature construction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Upper bound applied to the training RUL label
    pub rul_ceiling: f64,
    /// Low-information sensors removed before lagging
    pub drop_sensors: Vec<String>,
    /// Operational settings removed before lagging
    pub drop_settings: Vec<String>,
    /// Label columns removed from the training table only
    pub drop_targets: Vec<String>,
    /// Shift, in cycles, of the generated lag columns
    pub lag: NonZeroUsize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            rul_ceiling: 125.0,
            drop_sensors: to_strings(&[
                "sensor1", "sensor5", "sensor6", "sensor10", "sensor16", "sensor18", "sensor19",
            ]),
            drop_settings: to_strings(&[
                "operational_setting_1",
                "operational_setting_2",
                "operational_setting_3",
            ]),
            drop_targets: to_strings(&[RUL_COLUMN]),
            lag: NonZeroUsize::MIN,
        }
    }
}

impl FeatureConfig {
    /// Columns removed from the labeled training table
    pub fn training_drop_list(&self) -> Vec<String> {
        let mut list = self.inference_drop_list();
        list.extend(self.drop_targets.iter().cloned());
        list
    }

    /// Columns removed from an unlabeled inference table
    pub fn inference_drop_list(&self) -> Vec<String> {
        self.drop_sensors
            .iter()
            .chain(&self.drop_settings)
            .cloned()
            .collect()
    }
}

fn to_strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_lists() {
        let config = FeatureConfig::default();
        let train = config.training_drop_list();
        let test = config.inference_drop_list();

        assert_eq!(train.len(), 11);
        assert_eq!(test.len(), 10);
        assert_eq!(train.last().map(String::as_str), Some(RUL_COLUMN));
        assert!(!test.iter().any(|c| c == RUL_COLUMN));
        assert_eq!(&train[..10], test.as_slice());
    }
}
