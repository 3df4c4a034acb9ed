//! Erros específicos dos sensores de partículas

use airlog_core::SensorError;
use thiserror::Error;

pub type ParticulateResult<T> = Result<T, ParticulateError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParticulateError {
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Frame checksum mismatch: expected {expected:#06x}, computed {computed:#06x}")]
    ChecksumMismatch { expected: u16, computed: u16 },

    #[error("No samples accumulated in averaging window")]
    NoSamples,
}

// Conversão para SensorError do core
impl From<ParticulateError> for SensorError {
    fn from(err: ParticulateError) -> Self {
        match err {
            ParticulateError::NoSamples => {
                SensorError::InsufficientSamples(ParticulateError::NoSamples.to_string())
            }
            other => SensorError::ParseFailure(other.to_string()),
        }
    }
}
