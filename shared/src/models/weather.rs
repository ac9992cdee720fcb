//! Weather observation model

use serde::{Deserialize, Serialize};

/// A single weather observation for a location.
///
/// Produced once per advisory request, either from the live weather
/// provider or from the engine's fallback policy, and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature_celsius: f64,
    pub rainfall_mm: f64,
    pub humidity_percent: f64,
}
