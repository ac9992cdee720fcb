//! Core services for the Crop Advisory engine

pub mod advisory;
pub mod orchestrator;
pub mod weather;

pub use advisory::{build_explanation, fertilizer_recommendation, pest_disease_advisory};
pub use orchestrator::AdvisoryService;
pub use weather::WeatherProvider;
