//! End-to-end advisory orchestration
//!
//! Composes the weather provider, the crop predictor and the advisory
//! rules into one recommendation. This is the sole entry point the
//! surrounding application (auth, persistence, HTTP) calls: plain
//! data in, plain data out, no session or storage state. The only
//! failure it can surface is `ModelUnavailable` from the predictor;
//! every other component is total.

use shared::{Advisory, AdvisoryRequest, FeatureVector};

use crate::config::{AdvisoryConfig, Config};
use crate::error::AppResult;
use crate::ml::predictor::CropPredictor;
use crate::services::advisory::{
    build_explanation, fertilizer_recommendation, pest_disease_advisory,
};
use crate::services::weather::WeatherProvider;

/// Advisory orchestration service
pub struct AdvisoryService {
    weather: WeatherProvider,
    predictor: CropPredictor,
    advisory: AdvisoryConfig,
}

impl AdvisoryService {
    /// Create the service from application configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            weather: WeatherProvider::new(&config.weather),
            predictor: CropPredictor::new(config.model.artifact_path.clone()),
            advisory: config.advisory.clone(),
        }
    }

    /// The predictor, exposed so the owner of the training lifecycle
    /// can invalidate its cache after a retraining run.
    pub fn predictor(&self) -> &CropPredictor {
        &self.predictor
    }

    /// Produce one end-to-end recommendation.
    pub async fn recommend(&self, request: &AdvisoryRequest) -> AppResult<Advisory> {
        let weather = self.weather.resolve(&request.location).await;

        let features = FeatureVector::new(&request.soil, &weather);
        let (crop, confidence) = self.predictor.predict(&features)?;

        let fertilizer = fertilizer_recommendation(
            request.soil.nitrogen,
            request.soil.phosphorus,
            request.soil.potassium,
            self.advisory.deficiency_threshold,
        );
        let pest_advice = pest_disease_advisory(&crop, weather.humidity_percent, &request.season);
        let explanation = build_explanation(&crop, &fertilizer, &weather, confidence);

        tracing::info!(
            location = %request.location,
            crop = %crop,
            confidence = ?confidence,
            "advisory produced"
        );

        Ok(Advisory {
            crop,
            fertilizer,
            pest_advice,
            explanation,
            weather,
            confidence,
        })
    }
}
