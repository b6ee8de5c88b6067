//! Error types for golf-flight.
//!
//! Flight physics itself is infallible; errors only surface when building a
//! configuration or a dispersion batch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlightError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid dispersion parameters: {0}")]
    InvalidDispersion(String),
}

pub type Result<T> = std::result::Result<T, FlightError>;
