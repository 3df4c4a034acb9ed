//! Erros específicos do módulo acústico

use airlog_core::SensorError;
use thiserror::Error;

pub type AcousticResult<T> = Result<T, AcousticError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AcousticError {
    #[error("Capture device open failed: {0}")]
    DeviceOpenFailed(String),

    #[error("Audio capture failed: {0}")]
    CaptureFailed(String),

    #[error("No samples above the noise floor in {0}ms window")]
    InsufficientSamples(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),
}

// Conversão para SensorError do core
impl From<AcousticError> for SensorError {
    fn from(err: AcousticError) -> Self {
        match err {
            AcousticError::InsufficientSamples(window_ms) => SensorError::InsufficientSamples(
                AcousticError::InsufficientSamples(window_ms).to_string(),
            ),
            AcousticError::InvalidConfig(msg) => SensorError::InvalidConfig(msg),
            AcousticError::InvalidSampleRate(rate) => {
                SensorError::InvalidConfig(format!("Invalid sample rate: {}", rate))
            }
            other => SensorError::ReadFailure(other.to_string()),
        }
    }
}
