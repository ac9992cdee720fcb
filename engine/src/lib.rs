//! Crop Advisory engine
//!
//! Recommends a crop and supporting agronomic guidance (fertilizer,
//! pest/disease advisory, explanation text) from soil-nutrient
//! readings, a location-derived weather observation and a season
//! label. The library covers offline model selection and training,
//! online inference, the deterministic advisory rules and the
//! weather-fallback policy; web, auth and persistence layers live in
//! the surrounding application.

pub mod config;
pub mod error;
pub mod external;
pub mod ml;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
