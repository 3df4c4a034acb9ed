//! Janelas de amostragem limitadas por tempo de parede
//!
//! Uma `SamplingWindow` delimita uma redução por duração, não por contagem
//! de amostras. Pertence ao driver que faz a redução e é descartada depois
//! de produzir uma leitura.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Fonte de tempo monotônica
pub trait Clock: Send + Sync {
    /// Tempo decorrido desde uma origem arbitrária e fixa
    fn now(&self) -> Duration;
}

/// Relógio do sistema (monotônico)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Relógio determinístico: avança `step` a cada consulta
///
/// A primeira consulta devolve zero. Uma janela de `step * (n + 1)` aberta
/// neste relógio permanece aberta por exatamente `n` verificações.
#[derive(Debug)]
pub struct SteppedClock {
    step_nanos: u64,
    ticks: AtomicU64,
}

impl SteppedClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step_nanos: step.as_nanos() as u64,
            ticks: AtomicU64::new(0),
        }
    }

    /// Número de consultas feitas até agora
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Clock for SteppedClock {
    fn now(&self) -> Duration {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        Duration::from_nanos(tick.saturating_mul(self.step_nanos))
    }
}

/// Janela de amostragem aberta sobre um relógio
pub struct SamplingWindow<'c> {
    clock: &'c dyn Clock,
    opened_at: Duration,
    duration: Duration,
}

impl<'c> SamplingWindow<'c> {
    /// Abre a janela no instante atual do relógio
    pub fn open(duration: Duration, clock: &'c dyn Clock) -> Self {
        Self {
            clock,
            opened_at: clock.now(),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.opened_at)
    }

    /// A janela continua aberta enquanto `elapsed < duration`
    pub fn is_open(&self) -> bool {
        self.elapsed() < self.duration
    }
}

impl std::fmt::Debug for SamplingWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplingWindow")
            .field("opened_at", &self.opened_at)
            .field("duration", &self.duration)
            .finish()
    }
}
