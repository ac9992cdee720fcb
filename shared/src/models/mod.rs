//! Domain models for the Crop Advisory Platform

mod advisory;
mod soil;
mod weather;

pub use advisory::*;
pub use soil::*;
pub use weather::*;
