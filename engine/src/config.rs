//! Configuration management for the Crop Advisory engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with a CROP_ prefix and `__`
//!    between nesting levels, e.g. `CROP_WEATHER__API_KEY` for
//!    `weather.api_key`

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Classifier training and artifact configuration
    pub model: ModelConfig,

    /// Advisory rule configuration
    pub advisory: AdvisoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key; without one the provider synthesizes
    /// fallback observations
    #[serde(default)]
    pub api_key: Option<String>,

    /// Outbound request timeout in seconds (no retries)
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Persisted classifier artifact location
    pub artifact_path: PathBuf,

    /// Labeled sample table (CSV) consumed by training
    pub dataset_path: PathBuf,

    /// Held-out fraction for candidate scoring
    pub test_fraction: f64,

    /// RNG seed for splitting and bootstrap sampling
    pub seed: u64,

    /// Below this many rows the split falls back to unstratified
    pub stratify_min_rows: usize,

    /// Number of trees in the random-forest candidate
    pub forest_trees: usize,

    /// Optional depth cap shared by both candidate families
    #[serde(default)]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdvisoryConfig {
    /// Per-nutrient deficiency threshold (mg/kg) for fertilizer advice
    pub deficiency_threshold: f64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default(
                "weather.api_endpoint",
                "https://api.openweathermap.org/data/2.5",
            )?
            .set_default("weather.timeout_seconds", 10)?
            .set_default("model.artifact_path", "data/model.bin")?
            .set_default("model.dataset_path", "data/crop_recommendation_sample.csv")?
            .set_default("model.test_fraction", 0.3)?
            .set_default("model.seed", 42)?
            .set_default("model.stratify_min_rows", 50)?
            .set_default("model.forest_trees", 120)?
            .set_default("advisory.deficiency_threshold", 40.0)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROP_ prefix)
            .add_source(
                Environment::with_prefix("CROP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: None,
            timeout_seconds: 10,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("data/model.bin"),
            dataset_path: PathBuf::from("data/crop_recommendation_sample.csv"),
            test_fraction: 0.3,
            seed: 42,
            stratify_min_rows: 50,
            forest_trees: 120,
            max_depth: None,
        }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            deficiency_threshold: 40.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override_variable_shape() {
        // Pins the operator-facing spelling: CROP_ prefix, __ between
        // nesting levels
        std::env::set_var("CROP_WEATHER__API_KEY", "override-key");
        std::env::set_var("CROP_ADVISORY__DEFICIENCY_THRESHOLD", "35.5");

        let config = Config::load().unwrap();
        assert_eq!(config.weather.api_key.as_deref(), Some("override-key"));
        assert_eq!(config.advisory.deficiency_threshold, 35.5);

        std::env::remove_var("CROP_WEATHER__API_KEY");
        std::env::remove_var("CROP_ADVISORY__DEFICIENCY_THRESHOLD");
    }
}
