//! Erros de aquisição de sensores
//!
//! Toda falha aqui é fatal apenas para a invocação do driver que a produziu.
//! O ciclo de amostragem converte essas falhas em métricas ausentes.

use thiserror::Error;

pub type SensorResult<T> = Result<T, SensorError>;

/// Erro de sensor
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SensorError {
    /// Erro de I/O no stream subjacente
    #[error("Read failure: {0}")]
    ReadFailure(String),

    /// Payload textual ou binário malformado
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// A janela terminou sem nenhuma amostra utilizável
    #[error("Insufficient samples: {0}")]
    InsufficientSamples(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SensorError {
    /// Nome curto da categoria, usado em logs
    pub fn kind(&self) -> &'static str {
        match self {
            SensorError::ReadFailure(_) => "read",
            SensorError::ParseFailure(_) => "parse",
            SensorError::InsufficientSamples(_) => "insufficient-samples",
            SensorError::InvalidConfig(_) => "config",
        }
    }
}

impl From<std::io::Error> for SensorError {
    fn from(err: std::io::Error) -> Self {
        SensorError::ReadFailure(err.to_string())
    }
}
