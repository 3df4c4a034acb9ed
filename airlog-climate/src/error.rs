//! Erros do driver de clima

use airlog_core::SensorError;
use thiserror::Error;

pub type ClimateResult<T> = Result<T, ClimateError>;

/// Erros do módulo de clima
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClimateError {
    #[error("Sensor read failed: {0}")]
    SensorReadFailed(String),

    #[error("Malformed reading: {0}")]
    MalformedReading(String),

    #[error("Probe command failed: {0}")]
    CommandFailed(String),
}

// Conversão para SensorError do core
impl From<ClimateError> for SensorError {
    fn from(err: ClimateError) -> Self {
        match err {
            ClimateError::SensorReadFailed(msg) => SensorError::ReadFailure(msg),
            ClimateError::CommandFailed(msg) => SensorError::ReadFailure(msg),
            ClimateError::MalformedReading(msg) => SensorError::ParseFailure(msg),
        }
    }
}
