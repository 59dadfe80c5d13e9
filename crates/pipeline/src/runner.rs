//! Pipeline Runner

use crate::config::PipelineConfig;
use crate::report::{PipelineReport, UnitPrediction};
use crate::PipelineError;
use cmapss_data::{DatasetLoader, SubFleetData};
use data_validator::Validator;
use feature_engine::{FeatureBuilder, FeatureMatrix, SensorTable};
use rul_model::{evaluate, LinearRegression, ModelArtifact};
use std::collections::HashMap;
use tracing::{debug, info, warn, Level};

/// One-shot batch pipeline for a single sub-fleet
pub struct Pipeline {
    config: PipelineConfig,
    loader: DatasetLoader,
    builder: FeatureBuilder,
}

impl Pipeline {
    /// Create a pipeline from configuration
    pub fn new(config: PipelineConfig) -> Self {
        info!(
            "Creating pipeline for {} from {}",
            config.sub_fleet,
            config.data_dir.display()
        );
        Self {
            loader: DatasetLoader::with_validator(
                config.data_dir.clone(),
                Validator::new(config.validation.clone()),
            ),
            builder: FeatureBuilder::new(config.features.clone()),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the configured sub-fleet and run
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        let data = self.loader.load_sub_fleet(self.config.sub_fleet)?;
        self.run_on(&data)
    }

    /// Train, evaluate, and persist on already-loaded data
    pub fn run_on(&self, data: &SubFleetData) -> Result<PipelineReport, PipelineError> {
        self.log_drop_candidates(data)?;

        let train_set = self.builder.training_set(&data.train)?;
        let model = LinearRegression::fit(&train_set)?;
        let train_metrics = {
            let target = train_set.target().ok_or(rul_model::ModelError::MissingTarget)?;
            let fitted = model.predict(&train_set)?;
            evaluate(&target.to_vec(), &fitted.to_vec(), "train")?
        };

        let test_set = self.builder.inference_set(&data.test, train_set.columns())?;
        let predictions = model.predict(&test_set)?.to_vec();
        let (unit_predictions, skipped_units) =
            last_cycle_predictions(data, &test_set, &predictions)?;

        let test_metrics = if unit_predictions.is_empty() {
            warn!("No test unit has a retained row; test metrics unavailable");
            None
        } else {
            let truth: Vec<f64> = unit_predictions
                .iter()
                .map(|u| f64::from(u.true_rul))
                .collect();
            let predicted: Vec<f64> = unit_predictions.iter().map(|u| u.predicted_rul).collect();
            Some(evaluate(&truth, &predicted, "test")?)
        };

        let report = PipelineReport {
            sub_fleet: data.sub_fleet,
            train_units: data.train.len(),
            train_rows: train_set.nrows(),
            test_units: data.test.len(),
            test_rows: test_set.nrows(),
            feature_names: model.feature_names().to_vec(),
            intercept: model.intercept(),
            coefficients: model.coefficients().to_vec(),
            train_metrics,
            test_metrics,
            unit_predictions,
            skipped_units,
            artifact_path: self.config.artifact_path.clone(),
        };

        ModelArtifact::new(data.sub_fleet, model).save(&self.config.artifact_path)?;
        if let Some(path) = &self.config.report_path {
            report.write_json(path)?;
        }

        info!(
            "Pipeline finished for {}: {} features, {} evaluated test units",
            report.sub_fleet,
            report.feature_names.len(),
            report.unit_predictions.len()
        );
        Ok(report)
    }

    fn log_drop_candidates(&self, data: &SubFleetData) -> Result<(), PipelineError> {
        if !tracing::enabled!(Level::DEBUG) {
            return Ok(());
        }
        let candidates = self.drop_candidates(data)?;
        debug!("{}: near-constant raw columns {:?}", data.sub_fleet, candidates);
        Ok(())
    }

    /// Raw train columns whose spread is below the configured tolerance
    pub fn drop_candidates(&self, data: &SubFleetData) -> Result<Vec<String>, PipelineError> {
        let raw = SensorTable::from_trajectories(&data.train)?;
        Ok(self
            .builder
            .drop_candidates(&raw, self.config.constant_tolerance))
    }
}

/// Pair the prediction at each test unit's last retained row with its true RUL
fn last_cycle_predictions(
    data: &SubFleetData,
    test_set: &FeatureMatrix,
    predictions: &[f64],
) -> Result<(Vec<UnitPrediction>, Vec<u32>), PipelineError> {
    let last_rows: HashMap<u32, usize> = test_set
        .last_row_per_unit()
        .into_iter()
        .map(|row| (test_set.keys()[row].unit_number, row))
        .collect();

    let mut evaluated = Vec::with_capacity(data.test.len());
    let mut skipped = Vec::new();
    for trajectory in &data.test {
        let unit = trajectory.unit_number;
        let true_rul = data
            .true_rul_for(unit)
            .ok_or(PipelineError::MissingTrueRul { unit })?;
        match last_rows.get(&unit) {
            Some(&row) => evaluated.push(UnitPrediction {
                unit_number: unit,
                last_cycle: test_set.keys()[row].cycles,
                predicted_rul: predictions[row],
                true_rul,
            }),
            None => {
                warn!("Test unit {} has no row with a defined lag; skipped", unit);
                skipped.push(unit);
            }
        }
    }
    Ok((evaluated, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmapss_data::{CycleRecord, SubFleet, UnitTrajectory, SENSOR_COUNT};

    fn trajectory(unit: u32, len: u32) -> UnitTrajectory {
        let records = (1..=len)
            .map(|cycles| {
                let mut sensors = [0.0; SENSOR_COUNT];
                for (i, s) in sensors.iter_mut().enumerate() {
                    let wobble = ((unit * 7 + cycles * 13 + i as u32 * 31) % 17) as f64;
                    *s = 500.0 + i as f64 * 10.0 + 0.1 * cycles as f64 * (i + 1) as f64 + wobble;
                }
                CycleRecord {
                    unit_number: unit,
                    cycles,
                    settings: [0.0; 3],
                    sensors,
                }
            })
            .collect();
        UnitTrajectory::new(SubFleet::FD001, unit, records, &Validator::default())
            .unwrap()
            .0
    }

    fn config(dir: &std::path::Path) -> PipelineConfig {
        PipelineConfig {
            data_dir: dir.to_path_buf(),
            artifact_path: dir.join("models").join("rul.bin"),
            report_path: Some(dir.join("reports").join("run.json")),
            ..PipelineConfig::default()
        }
    }

    fn data(test: Vec<UnitTrajectory>, true_rul: Vec<u32>) -> SubFleetData {
        SubFleetData {
            sub_fleet: SubFleet::FD001,
            train: (1..=4).map(|u| trajectory(u, 30 + u * 5)).collect(),
            test,
            true_rul,
        }
    }

    #[test]
    fn test_run_on_writes_artifact_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(config(dir.path()));
        let data = data(
            vec![trajectory(1, 12), trajectory(2, 1), trajectory(3, 20)],
            vec![40, 90, 15],
        );

        let report = pipeline.run_on(&data).unwrap();

        assert_eq!(report.train_units, 4);
        assert_eq!(report.train_rows, 35 + 40 + 45 + 50 - 4);
        assert_eq!(report.test_rows, 11 + 19);
        assert_eq!(report.feature_names.len(), 28);
        assert_eq!(report.skipped_units, vec![2]);

        let units: Vec<(u32, u32, u32)> = report
            .unit_predictions
            .iter()
            .map(|u| (u.unit_number, u.last_cycle, u.true_rul))
            .collect();
        assert_eq!(units, vec![(1, 12, 40), (3, 20, 15)]);
        assert_eq!(report.test_metrics.as_ref().unwrap().n_samples, 2);

        let artifact = ModelArtifact::load(&pipeline.config().artifact_path).unwrap();
        assert_eq!(artifact.model.feature_names(), report.feature_names.as_slice());

        let report_path = dir.path().join("reports").join("run.json");
        let written = PipelineReport::read_json(&report_path).unwrap();
        assert_eq!(written.feature_names, report.feature_names);
        assert_eq!(written.skipped_units, vec![2]);
        assert_eq!(written.unit_predictions.len(), 2);
    }

    #[test]
    fn test_missing_true_rul() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(config(dir.path()));
        let data = data(vec![trajectory(1, 5), trajectory(2, 6)], vec![40]);

        let err = pipeline.run_on(&data).unwrap_err();
        assert!(matches!(err, PipelineError::MissingTrueRul { unit: 2 }));
        assert!(!pipeline.config().artifact_path.exists());
    }

    #[test]
    fn test_drop_candidates_use_configured_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(vec![trajectory(1, 5)], vec![40]);

        let strict = Pipeline::new(config(dir.path())).drop_candidates(&data).unwrap();
        // settings are constant zero in the fixture
        assert_eq!(strict.len(), 3);
        assert!(strict.iter().all(|c| c.starts_with("operational_setting")));

        let loose = Pipeline::new(PipelineConfig {
            constant_tolerance: 1e9,
            ..config(dir.path())
        })
        .drop_candidates(&data)
        .unwrap();
        assert_eq!(loose.len(), 24);
    }

    #[test]
    fn test_all_test_units_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(config(dir.path()));
        let data = data(vec![trajectory(1, 1)], vec![100]);

        let report = pipeline.run_on(&data).unwrap();
        assert!(report.test_metrics.is_none());
        assert!(report.unit_predictions.is_empty());
        assert_eq!(report.skipped_units, vec![1]);
    }
}
