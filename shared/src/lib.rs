//! Shared types and models for the Crop Advisory Platform
//!
//! This crate contains the plain-data types exchanged between the
//! advisory engine and its callers (CLI today, web or WASM surfaces
//! later), plus input validation helpers.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
