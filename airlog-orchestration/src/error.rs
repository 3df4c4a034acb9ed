//! Erros de orquestração

use airlog_core::Metric;
use thiserror::Error;

use crate::report::DriverFailure;

pub type OrchestrationResult<T> = Result<T, OrchestrationError>;

/// Erros de orquestração
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrchestrationError {
    /// Todos os drivers falharam no ciclo
    #[error("No data acquired: all {} drivers failed", .failures.len())]
    NoDataAcquired { failures: Vec<DriverFailure> },

    /// Dois drivers declaram a mesma métrica
    #[error("Metric {metric} produced by both '{first}' and '{second}'")]
    DuplicateMetric {
        metric: Metric,
        first: String,
        second: String,
    },

    /// Coordenador sem drivers
    #[error("No drivers configured")]
    NoDrivers,

    /// Configuração inválida
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl OrchestrationError {
    /// Falhas por driver, quando o ciclo não produziu nada
    pub fn failures(&self) -> &[DriverFailure] {
        match self {
            OrchestrationError::NoDataAcquired { failures } => failures,
            _ => &[],
        }
    }
}
