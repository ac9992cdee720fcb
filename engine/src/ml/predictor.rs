//! Crop predictor over the persisted classifier artifact
//!
//! The artifact is loaded lazily on first use and cached for the
//! process lifetime. `invalidate` is the only way to force a reload;
//! it belongs to whoever owns the training lifecycle, never to the
//! inference path itself.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use shared::FeatureVector;

use crate::error::{AppError, AppResult};
use crate::ml::trainer::ModelArtifact;

/// Lazily-loaded crop predictor.
pub struct CropPredictor {
    artifact_path: PathBuf,
    cache: RwLock<Option<Arc<ModelArtifact>>>,
}

impl CropPredictor {
    pub fn new(artifact_path: PathBuf) -> Self {
        Self {
            artifact_path,
            cache: RwLock::new(None),
        }
    }

    /// Predict the crop label (and confidence, when the winning
    /// family exposes one) for a feature vector.
    pub fn predict(&self, features: &FeatureVector) -> AppResult<(String, Option<f64>)> {
        let artifact = self.load()?;
        let (index, confidence) = artifact.model.predict_with_confidence(features.as_slice());

        // The training-time label set is the entire legal vocabulary;
        // anything outside it means the artifact is corrupt.
        let crop = artifact
            .labels
            .get(index)
            .cloned()
            .ok_or_else(|| {
                AppError::Artifact(format!(
                    "predicted class index {index} is outside the stored label set ({} labels)",
                    artifact.labels.len()
                ))
            })?;

        Ok((crop, confidence))
    }

    /// Drop the cached artifact so the next prediction reloads from
    /// disk. Called after a retraining run replaces the file.
    pub fn invalidate(&self) -> AppResult<()> {
        let mut guard = self
            .cache
            .write()
            .map_err(|_| AppError::Artifact("model cache lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }

    fn load(&self) -> AppResult<Arc<ModelArtifact>> {
        {
            let guard = self
                .cache
                .read()
                .map_err(|_| AppError::Artifact("model cache lock poisoned".to_string()))?;
            if let Some(artifact) = guard.as_ref() {
                return Ok(Arc::clone(artifact));
            }
        }

        let mut guard = self
            .cache
            .write()
            .map_err(|_| AppError::Artifact("model cache lock poisoned".to_string()))?;
        // Another request may have loaded while we waited for the lock
        if let Some(artifact) = guard.as_ref() {
            return Ok(Arc::clone(artifact));
        }

        let bytes = match fs::read(&self.artifact_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(AppError::ModelUnavailable {
                    path: self.artifact_path.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        let artifact: ModelArtifact = bincode::deserialize(&bytes)
            .map_err(|e| AppError::Artifact(format!("failed to decode artifact: {e}")))?;
        tracing::info!(
            path = %self.artifact_path.display(),
            family = %artifact.family,
            accuracy = artifact.accuracy,
            "model artifact loaded"
        );

        let artifact = Arc::new(artifact);
        *guard = Some(Arc::clone(&artifact));
        Ok(artifact)
    }
}
