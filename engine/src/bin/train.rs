//! Training entry point
//!
//! Reads the labeled sample table, fits both candidate classifier
//! families, logs a per-family accuracy report and persists the
//! winner at the configured artifact path.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crop_advisory_engine::ml::{Dataset, ModelTrainer};
use crop_advisory_engine::Config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advisory_train=info,crop_advisory_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting crop classifier training");
    tracing::info!(dataset = %config.model.dataset_path.display(), "loading sample table");

    let dataset = Dataset::from_csv(&config.model.dataset_path)?;
    tracing::info!(
        samples = dataset.n_samples(),
        labels = ?dataset.labels,
        "sample table loaded"
    );

    let trainer = ModelTrainer::new(config.model.clone());
    let artifact = trainer.train_and_persist(&dataset)?;

    tracing::info!(
        family = %artifact.family,
        accuracy = format!("{:.4}", artifact.accuracy),
        path = %config.model.artifact_path.display(),
        "training complete"
    );

    Ok(())
}
