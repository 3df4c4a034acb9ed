//! Resultado de um ciclo de amostragem

use std::fmt;
use std::time::Duration;

use airlog_core::{Metric, ReadingSet, SensorError, SensorModel};
use serde::Serialize;
use thiserror::Error;

/// Por que um driver não contribuiu para o ciclo
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FailureCause {
    #[error("{0}")]
    Sensor(SensorError),

    #[error("driver panicked")]
    Panicked,

    #[error("thread spawn failed: {0}")]
    SpawnFailed(String),
}

/// Falha de um driver em um ciclo
#[derive(Debug, Clone, PartialEq)]
pub struct DriverFailure {
    pub driver: String,
    pub sensor: SensorModel,
    pub cause: FailureCause,
}

impl DriverFailure {
    pub fn new(driver: impl Into<String>, sensor: SensorModel, cause: FailureCause) -> Self {
        Self {
            driver: driver.into(),
            sensor,
            cause,
        }
    }

    /// Erro de sensor subjacente, se houver
    pub fn sensor_error(&self) -> Option<&SensorError> {
        match &self.cause {
            FailureCause::Sensor(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for DriverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.driver, self.sensor, self.cause)
    }
}

/// Saída de um ciclo com pelo menos uma métrica
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    cycle: u64,
    readings: ReadingSet,
    #[serde(skip)]
    failures: Vec<DriverFailure>,
    #[serde(skip)]
    elapsed: Duration,
}

impl CycleReport {
    pub fn new(
        cycle: u64,
        readings: ReadingSet,
        failures: Vec<DriverFailure>,
        elapsed: Duration,
    ) -> Self {
        Self {
            cycle,
            readings,
            failures,
            elapsed,
        }
    }

    /// Número do ciclo (a partir de 1)
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn readings(&self) -> &ReadingSet {
        &self.readings
    }

    pub fn failures(&self) -> &[DriverFailure] {
        &self.failures
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Algum driver falhou?
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Métricas que não chegaram, dentre as esperadas
    pub fn missing<'a>(&'a self, expected: &'a [Metric]) -> impl Iterator<Item = Metric> + 'a {
        expected
            .iter()
            .copied()
            .filter(|metric| !self.readings.contains(*metric))
    }

    pub fn into_readings(self) -> ReadingSet {
        self.readings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airlog_core::Reading;

    #[test]
    fn test_failure_display() {
        let failure = DriverFailure::new(
            "sds",
            SensorModel::Sds021,
            FailureCause::Sensor(SensorError::ReadFailure("timeout".into())),
        );
        assert_eq!(failure.to_string(), "sds (SDS021): Read failure: timeout");
        assert!(failure.sensor_error().is_some());

        let panicked = DriverFailure::new("mic", SensorModel::Microphone, FailureCause::Panicked);
        assert!(panicked.sensor_error().is_none());
    }

    #[test]
    fn test_missing_metrics() {
        let readings: ReadingSet = [Reading::new(SensorModel::Dht22, Metric::Humidity, 40.0)]
            .into_iter()
            .collect();
        let report = CycleReport::new(1, readings, Vec::new(), Duration::ZERO);

        let missing: Vec<_> = report
            .missing(&[Metric::Temperature, Metric::Humidity])
            .collect();
        assert_eq!(missing, vec![Metric::Temperature]);
        assert!(!report.is_partial());
    }
}
