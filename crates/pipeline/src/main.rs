//! Turbofan RUL Pipeline - Main Entry Point

use anyhow::Context;
use pipeline::{init_logging, Pipeline, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = PipelineConfig::load(config_path.as_deref())
        .context("failed to load pipeline configuration")?;
    init_logging(&config.log_level);

    info!("=== Turbofan RUL Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Training on {} from {}",
        config.sub_fleet,
        config.data_dir.display()
    );

    let report = Pipeline::new(config).run()?;

    info!(
        "Train RMSE {:.3}, R2 {:.3} over {} rows",
        report.train_metrics.rmse, report.train_metrics.r2, report.train_rows
    );
    match &report.test_metrics {
        Some(test) => info!(
            "Test RMSE {:.3}, R2 {:.3} over {} units",
            test.rmse, test.r2, test.n_samples
        ),
        None => info!("No test units evaluated"),
    }
    info!("Model artifact: {}", report.artifact_path.display());

    Ok(())
}
