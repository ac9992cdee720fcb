//! Model selection: fit candidate classifier families, score them on
//! a held-out partition, persist the winner
//!
//! Exactly two families compete: a single CART tree and a bagged
//! forest. The strictly higher test accuracy wins; ties keep the
//! first-evaluated candidate (the tree). Each training run fully
//! replaces the previous artifact via a temp-file-plus-rename write,
//! so a concurrent reader sees either the old or the new artifact,
//! never a torn one.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::{AppError, AppResult};
use crate::ml::dataset::Dataset;
use crate::ml::forest::RandomForest;
use crate::ml::tree::{DecisionTree, TreeParams};

/// The two candidate classifier families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFamily {
    DecisionTree,
    RandomForest,
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::DecisionTree => write!(f, "DecisionTree"),
            ModelFamily::RandomForest => write!(f, "RandomForest"),
        }
    }
}

/// A fitted classifier of either family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrainedModel {
    Tree(DecisionTree),
    Forest(RandomForest),
}

impl TrainedModel {
    pub fn predict(&self, features: &[f64]) -> usize {
        match self {
            TrainedModel::Tree(tree) => tree.predict_row(features),
            TrainedModel::Forest(forest) => forest.predict_row(features),
        }
    }

    /// Predict with per-class probability where the family supports
    /// it. The single tree reports no confidence at all, which is a
    /// different signal than zero confidence.
    pub fn predict_with_confidence(&self, features: &[f64]) -> (usize, Option<f64>) {
        match self {
            TrainedModel::Tree(tree) => (tree.predict_row(features), None),
            TrainedModel::Forest(forest) => {
                let (label, confidence) = forest.predict_row_with_confidence(features);
                (label, Some(confidence))
            }
        }
    }
}

/// The serialized unit of persistence between training and inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub family: ModelFamily,
    /// The only labels the classifier may ever emit
    pub labels: Vec<String>,
    /// Held-out accuracy of the winning candidate
    pub accuracy: f64,
    pub trained_at: DateTime<Utc>,
    pub model: TrainedModel,
}

/// Trains candidate classifiers and owns artifact persistence.
pub struct ModelTrainer {
    config: ModelConfig,
}

impl ModelTrainer {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// Fit both candidate families and return the winning artifact.
    pub fn train(&self, dataset: &Dataset) -> AppResult<ModelArtifact> {
        if dataset.n_samples() == 0 {
            return Err(AppError::InsufficientData(
                "the training table is empty".to_string(),
            ));
        }
        if dataset.n_classes() < 2 {
            return Err(AppError::InsufficientData(format!(
                "a classifier requires at least 2 distinct crop labels, found {}",
                dataset.n_classes()
            )));
        }

        let (train_rows, test_rows) = dataset.split(
            self.config.test_fraction,
            self.config.seed,
            self.config.stratify_min_rows,
        );
        tracing::info!(
            train = train_rows.len(),
            test = test_rows.len(),
            classes = dataset.n_classes(),
            "partitioned training table"
        );

        let tree_params = TreeParams {
            max_depth: self.config.max_depth,
            ..TreeParams::default()
        };
        let tree = TrainedModel::Tree(DecisionTree::fit(
            &dataset.records,
            &dataset.targets,
            &train_rows,
            dataset.n_classes(),
            &tree_params,
        ));
        let tree_accuracy = accuracy(&dataset.records, &dataset.targets, &test_rows, &tree);
        tracing::info!(family = %ModelFamily::DecisionTree, accuracy = tree_accuracy, "candidate scored");

        let forest = TrainedModel::Forest(RandomForest::fit(
            &dataset.records,
            &dataset.targets,
            &train_rows,
            dataset.n_classes(),
            self.config.forest_trees,
            self.config.max_depth,
            self.config.seed,
        ));
        let forest_accuracy = accuracy(&dataset.records, &dataset.targets, &test_rows, &forest);
        tracing::info!(family = %ModelFamily::RandomForest, accuracy = forest_accuracy, "candidate scored");

        // Strictly higher accuracy wins; a tie keeps the tree
        let (family, model, best_accuracy) = if forest_accuracy > tree_accuracy {
            (ModelFamily::RandomForest, forest, forest_accuracy)
        } else {
            (ModelFamily::DecisionTree, tree, tree_accuracy)
        };
        tracing::info!(family = %family, accuracy = best_accuracy, "selected model");

        Ok(ModelArtifact {
            family,
            labels: dataset.labels.clone(),
            accuracy: best_accuracy,
            trained_at: Utc::now(),
            model,
        })
    }

    /// Train and atomically replace the persisted artifact.
    pub fn train_and_persist(&self, dataset: &Dataset) -> AppResult<ModelArtifact> {
        let artifact = self.train(dataset)?;
        self.persist(&artifact)?;
        Ok(artifact)
    }

    /// Write the artifact next to its final location, then rename it
    /// into place so readers never observe a partial file.
    pub fn persist(&self, artifact: &ModelArtifact) -> AppResult<()> {
        let path = &self.config.artifact_path;
        let bytes = bincode::serialize(artifact)
            .map_err(|e| AppError::Artifact(format!("failed to encode artifact: {e}")))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let staging = staging_path(path);
        fs::write(&staging, &bytes)?;
        fs::rename(&staging, path)?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "artifact persisted");
        Ok(())
    }
}

fn staging_path(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "model.bin".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Fraction of held-out rows the model classifies correctly.
fn accuracy(x: &Array2<f64>, y: &[usize], rows: &[usize], model: &TrainedModel) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let correct = rows
        .iter()
        .filter(|&&row| {
            let features: Vec<f64> = x.row(row).to_vec();
            model.predict(&features) == y[row]
        })
        .count();
    correct as f64 / rows.len() as f64
}
