//! Coordenador de ciclos: fan-out de drivers, fan-in de leituras

use std::collections::BTreeMap;
use std::time::Instant;

use airlog_core::prelude::*;
use crossbeam_channel::bounded;
use tracing::{debug, info, warn};

use crate::error::{OrchestrationError, OrchestrationResult};
use crate::report::{CycleReport, DriverFailure, FailureCause};

/// Resultado enviado por cada thread de driver
type Outcome = (usize, SensorResult<Vec<Reading>>);

/// Coordenador de amostragem
///
/// Dono exclusivo dos drivers. Cada ciclo lança uma thread por driver,
/// espera todas terminarem e monta o `ReadingSet`.
pub struct SamplingCoordinator {
    drivers: Vec<Box<dyn Driver>>,
    cycles: u64,
}

impl SamplingCoordinator {
    /// Cria coordenador
    ///
    /// Falha se a lista está vazia ou se duas entradas declaram a mesma
    /// métrica.
    pub fn new(drivers: Vec<Box<dyn Driver>>) -> OrchestrationResult<Self> {
        if drivers.is_empty() {
            return Err(OrchestrationError::NoDrivers);
        }

        let mut owners: BTreeMap<Metric, &str> = BTreeMap::new();
        for driver in &drivers {
            for &metric in driver.metrics() {
                if let Some(first) = owners.insert(metric, driver.name()) {
                    return Err(OrchestrationError::DuplicateMetric {
                        metric,
                        first: first.to_string(),
                        second: driver.name().to_string(),
                    });
                }
            }
        }

        Ok(Self { drivers, cycles: 0 })
    }

    /// Número de drivers
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn driver_names(&self) -> Vec<&str> {
        self.drivers.iter().map(|d| d.name()).collect()
    }

    /// Todas as métricas que este conjunto de drivers pode produzir
    pub fn metrics(&self) -> Vec<Metric> {
        let mut metrics: Vec<Metric> = self
            .drivers
            .iter()
            .flat_map(|d| d.metrics().iter().copied())
            .collect();
        metrics.sort();
        metrics
    }

    /// Ciclos executados até agora
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Executa um ciclo de amostragem
    ///
    /// Retorna `NoDataAcquired` somente se nenhuma métrica chegou.
    pub fn run_cycle(&mut self) -> OrchestrationResult<CycleReport> {
        self.cycles += 1;
        let cycle = self.cycles;
        let started = Instant::now();

        let (outcomes, mut failures) = self.fan_out();

        let mut readings = ReadingSet::new();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            let driver = &self.drivers[index];
            match outcome {
                Some(Ok(produced)) if produced.is_empty() => {
                    warn!(driver = driver.name(), "Driver returned no readings");
                    failures.push(DriverFailure::new(
                        driver.name(),
                        driver.sensor(),
                        FailureCause::Sensor(SensorError::InsufficientSamples(
                            "driver returned no readings".into(),
                        )),
                    ));
                }
                Some(Ok(produced)) => {
                    debug!(driver = driver.name(), count = produced.len(), "Driver finished");
                    readings.extend(produced);
                }
                Some(Err(err)) => {
                    warn!(driver = driver.name(), error = %err, "Driver failed");
                    failures.push(DriverFailure::new(
                        driver.name(),
                        driver.sensor(),
                        FailureCause::Sensor(err),
                    ));
                }
                None => {
                    // Sem resultado e sem falha de spawn: a thread entrou em pânico
                    if !failures.iter().any(|f| f.driver == driver.name()) {
                        warn!(driver = driver.name(), "Driver panicked");
                        failures.push(DriverFailure::new(
                            driver.name(),
                            driver.sensor(),
                            FailureCause::Panicked,
                        ));
                    }
                }
            }
        }

        let elapsed = started.elapsed();

        if readings.is_empty() {
            warn!(cycle, failures = failures.len(), "No data acquired");
            return Err(OrchestrationError::NoDataAcquired { failures });
        }

        info!(
            cycle,
            metrics = readings.len(),
            failures = failures.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Sampling cycle complete"
        );

        Ok(CycleReport::new(cycle, readings, failures, elapsed))
    }

    /// Uma thread por driver, juntadas antes de retornar
    fn fan_out(&mut self) -> (Vec<Option<SensorResult<Vec<Reading>>>>, Vec<DriverFailure>) {
        let count = self.drivers.len();
        let (tx, rx) = bounded::<Outcome>(count);
        let mut spawn_failures = Vec::new();

        let joined = crossbeam_utils::thread::scope(|scope| {
            for (index, driver) in self.drivers.iter_mut().enumerate() {
                let tx = tx.clone();
                let name = driver.name().to_string();
                let sensor = driver.sensor();

                let spawned = scope
                    .builder()
                    .name(format!("airlog-{}", name))
                    .spawn(move |_| {
                        let outcome = driver.acquire();
                        // O receptor vive até o fim do escopo
                        let _ = tx.send((index, outcome));
                    });

                if let Err(err) = spawned {
                    warn!(driver = %name, error = %err, "Failed to spawn driver thread");
                    spawn_failures.push(DriverFailure::new(
                        name,
                        sensor,
                        FailureCause::SpawnFailed(err.to_string()),
                    ));
                }
            }
        });
        drop(tx);

        if joined.is_err() {
            debug!("At least one driver thread panicked");
        }

        let mut outcomes: Vec<Option<SensorResult<Vec<Reading>>>> =
            (0..count).map(|_| None).collect();
        for (index, outcome) in rx.try_iter() {
            outcomes[index] = Some(outcome);
        }

        (outcomes, spawn_failures)
    }
}

impl std::fmt::Debug for SamplingCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplingCoordinator")
            .field("drivers", &self.driver_names())
            .field("cycles", &self.cycles)
            .finish()
    }
}
