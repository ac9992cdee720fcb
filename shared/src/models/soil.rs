//! Soil nutrient models

use serde::{Deserialize, Serialize};

/// A soil-nutrient reading supplied by the caller for one request.
///
/// Nutrient values are conventionally in mg/kg, pH on the usual
/// 0-14 scale. The engine validates numeric parseability only;
/// agronomic plausibility is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
}
