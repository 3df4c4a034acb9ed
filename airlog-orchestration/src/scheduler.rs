//! Scheduler para ciclos periódicos de amostragem

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{OrchestrationError, OrchestrationResult};

/// Configuração do scheduler
///
/// O intervalo conta a partir do fim do ciclo anterior (delay fixo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Espera entre o fim de um ciclo e o início do próximo
    pub interval: Duration,
    /// Número máximo de ciclos (None = sem limite)
    pub max_cycles: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_cycles: None,
        }
    }
}

/// Scheduler de ciclos
#[derive(Debug)]
pub struct Scheduler {
    config: SchedulerConfig,
    last_tick: Option<Instant>,
    last_finished: Option<Instant>,
    tick_count: u64,
    total_execution_time: Duration,
    min_execution_time: Option<Duration>,
    max_execution_time: Option<Duration>,
}

impl Scheduler {
    /// Cria novo scheduler
    pub fn new(config: SchedulerConfig) -> OrchestrationResult<Self> {
        if config.interval.is_zero() {
            return Err(OrchestrationError::InvalidConfiguration(
                "Scheduler interval must be > 0".into(),
            ));
        }

        Ok(Self {
            config,
            last_tick: None,
            last_finished: None,
            tick_count: 0,
            total_execution_time: Duration::ZERO,
            min_execution_time: None,
            max_execution_time: None,
        })
    }

    /// Scheduler de delay fixo com o intervalo dado
    pub fn with_interval(interval: Duration) -> OrchestrationResult<Self> {
        Self::new(SchedulerConfig {
            interval,
            ..SchedulerConfig::default()
        })
    }

    /// Limita o número de ciclos
    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.config.max_cycles = Some(max_cycles);
        self
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    /// Todos os ciclos permitidos já rodaram?
    pub fn is_finished(&self) -> bool {
        self.config
            .max_cycles
            .is_some_and(|max| self.tick_count >= max)
    }

    /// Aguarda até o próximo ciclo
    ///
    /// O primeiro tick é imediato.
    pub fn wait_for_next_tick(&mut self) -> OrchestrationResult<TickInfo> {
        let now = Instant::now();
        let interval = self.config.interval;

        if let Some(reference) = self.last_finished.or(self.last_tick) {
            let elapsed = now.duration_since(reference);
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }

        let tick = Instant::now();
        let since_last = self
            .last_tick
            .map(|last| tick.duration_since(last))
            .unwrap_or(Duration::ZERO);

        self.last_tick = Some(tick);
        self.tick_count += 1;

        Ok(TickInfo {
            tick_number: self.tick_count,
            elapsed: since_last,
        })
    }

    /// Registra tempo de execução de um ciclo
    pub fn record_execution_time(&mut self, duration: Duration) {
        self.last_finished = Some(Instant::now());
        self.total_execution_time += duration;

        if self.min_execution_time.is_none_or(|min| duration < min) {
            self.min_execution_time = Some(duration);
        }

        if self.max_execution_time.is_none_or(|max| duration > max) {
            self.max_execution_time = Some(duration);
        }
    }

    /// Retorna estatísticas do scheduler
    pub fn stats(&self) -> SchedulerStats {
        let avg_execution_time = if self.tick_count > 0 {
            self.total_execution_time / self.tick_count as u32
        } else {
            Duration::ZERO
        };

        SchedulerStats {
            tick_count: self.tick_count,
            interval: self.config.interval,
            avg_execution_time,
            min_execution_time: self.min_execution_time.unwrap_or(Duration::ZERO),
            max_execution_time: self.max_execution_time.unwrap_or(Duration::ZERO),
        }
    }

    /// Retorna número de ciclos executados
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

/// Informações sobre um tick
#[derive(Debug, Clone)]
pub struct TickInfo {
    /// Número do ciclo (a partir de 1)
    pub tick_number: u64,
    /// Tempo desde o tick anterior
    pub elapsed: Duration,
}

/// Estatísticas do scheduler
#[derive(Debug, Clone)]
pub struct SchedulerStats {
    pub tick_count: u64,
    pub interval: Duration,
    /// Tempo médio de execução
    pub avg_execution_time: Duration,
    pub min_execution_time: Duration,
    pub max_execution_time: Duration,
}
