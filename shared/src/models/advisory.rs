//! Advisory request/result models and the classifier feature contract

use serde::{Deserialize, Serialize};

use crate::models::{SoilSample, WeatherObservation};

/// Everything a caller supplies for one advisory request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub location: String,
    pub soil: SoilSample,
    pub season: String,
}

/// The structured advisory returned to the caller.
///
/// Produced once per request and handed over wholesale; the engine
/// keeps no copy. `confidence` is absent (not zero) when the winning
/// classifier family does not expose per-class probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    pub crop: String,
    pub fertilizer: String,
    pub pest_advice: String,
    pub explanation: String,
    pub weather: WeatherObservation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// The ordered 7-tuple of numeric classifier inputs.
///
/// The order (nitrogen, phosphorus, potassium, ph, rainfall,
/// temperature, humidity) is a binding contract between training and
/// inference: the persisted model encodes columns positionally, not
/// by name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; Self::LEN],
}

impl FeatureVector {
    pub const LEN: usize = 7;

    /// Assemble the feature vector from a soil reading and a weather
    /// observation, in the contract order.
    pub fn new(soil: &SoilSample, weather: &WeatherObservation) -> Self {
        Self {
            values: [
                soil.nitrogen,
                soil.phosphorus,
                soil.potassium,
                soil.ph,
                weather.rainfall_mm,
                weather.temperature_celsius,
                weather.humidity_percent,
            ],
        }
    }

    pub fn from_array(values: [f64; Self::LEN]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
