//! Prediction client: serializes the canvas, talks to the classification
//! service, and hands outcomes back to the Wayland loop.

pub mod client;
pub mod encode;
pub mod types;

mod manager;
#[cfg(test)]
mod tests;

pub use client::{HttpPredictionService, PredictionService};
pub use encode::{encode_sketch, png_data_url};
pub use manager::PredictionManager;
pub use types::{
    Digit, HealthStatus, PREDICTION_FAILED_NOTICE, Prediction, PredictionError,
    PredictionOutcome, RankedDigit, format_percent,
};
