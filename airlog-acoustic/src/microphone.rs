//! Driver de nível sonoro sobre um microfone de captura

use std::sync::Arc;
use std::time::Duration;

use airlog_core::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AcousticError, AcousticResult};
use crate::source::SampleOpener;
use crate::types::{DEFAULT_NOISE_FLOOR, DEFAULT_NORMALIZATION_OFFSET, DecibelAccumulator};

const METRICS: [Metric; 1] = [Metric::SoundLevel];

/// Configuração de microfone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u8,
    /// Amostras por bloco lido do dispositivo
    pub block_size: usize,
    /// Janela de média
    pub window: Duration,
    /// Amostras com `s²` até este valor são silêncio
    pub noise_floor: f64,
    /// Subtraído da média de `20 · log10(s²)`
    pub normalization_offset: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 1, // Mono
            block_size: 8000,
            window: Duration::from_secs(5),
            noise_floor: DEFAULT_NOISE_FLOOR,
            normalization_offset: DEFAULT_NORMALIZATION_OFFSET,
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> AcousticResult<()> {
        if self.sample_rate < 8000 || self.sample_rate > 192_000 {
            return Err(AcousticError::InvalidSampleRate(self.sample_rate));
        }

        if self.block_size == 0 {
            return Err(AcousticError::InvalidConfig("Block size must be > 0".into()));
        }

        if self.channels == 0 || self.channels > 8 {
            return Err(AcousticError::InvalidConfig(
                "Channels must be between 1 and 8".into(),
            ));
        }

        if !self.noise_floor.is_finite() || self.noise_floor < 0.0 {
            return Err(AcousticError::InvalidConfig(
                "Noise floor must be a finite, non-negative value".into(),
            ));
        }

        if !self.normalization_offset.is_finite() {
            return Err(AcousticError::InvalidConfig(
                "Normalization offset must be finite".into(),
            ));
        }

        Ok(())
    }
}

/// Sensor de nível sonoro
///
/// Lê blocos de amostras até o tempo de parede atingir a janela e reduz
/// tudo a uma leitura em dB equivalente.
pub struct AcousticLevelDriver {
    opener: Box<dyn SampleOpener>,
    config: AudioConfig,
    clock: Arc<dyn Clock>,
}

impl AcousticLevelDriver {
    pub fn new(opener: impl SampleOpener + 'static, config: AudioConfig) -> AcousticResult<Self> {
        config.validate()?;

        Ok(Self {
            opener: Box::new(opener),
            config,
            clock: Arc::new(SystemClock::new()),
        })
    }

    /// Substitui a fonte de tempo da janela
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Número de canais
    pub fn channels(&self) -> u8 {
        self.config.channels
    }

    fn measure(&mut self) -> AcousticResult<(f64, DecibelAccumulator)> {
        let mut source = self.opener.open()?;
        let mut block = vec![0i16; self.config.block_size];
        let mut accumulator = DecibelAccumulator::new(self.config.noise_floor);

        let window = SamplingWindow::open(self.config.window, self.clock.as_ref());
        while window.is_open() {
            let count = source.read_samples(&mut block)?;
            if count == 0 {
                std::thread::yield_now();
                continue;
            }
            accumulator.push_block(&block[..count]);
        }

        let level = accumulator
            .mean(self.config.normalization_offset)
            .ok_or(AcousticError::InsufficientSamples(
                self.config.window.as_millis() as u64,
            ))?;

        Ok((level, accumulator))
    }
}

impl Driver for AcousticLevelDriver {
    fn name(&self) -> &str {
        "microphone"
    }

    fn sensor(&self) -> SensorModel {
        SensorModel::Microphone
    }

    fn metrics(&self) -> &[Metric] {
        &METRICS
    }

    fn acquire(&mut self) -> SensorResult<Vec<Reading>> {
        let (level, accumulator) = self.measure()?;
        let captured_at = chrono::Utc::now();

        debug!(
            decibels = level,
            samples = accumulator.count(),
            silent = accumulator.skipped(),
            "Sound reading"
        );

        Ok(vec![Reading::at(
            self.sensor(),
            Metric::SoundLevel,
            level,
            captured_at,
        )])
    }
}

impl std::fmt::Debug for AcousticLevelDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcousticLevelDriver")
            .field("source", &self.opener.describe())
            .field("config", &self.config)
            .finish()
    }
}
