//! Driver Nova SDS011/SDS018/SDS021 (variante sem frames)

use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use airlog_core::frame::DEFAULT_MAX_IDLE_READS;
use airlog_core::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::types::{NovaSample, ParticulateAverage};

const METRICS: [Metric; 2] = [Metric::Pm25, Metric::Pm10];

/// Configuração do driver Nova
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaConfig {
    /// Janela de média
    pub window: Duration,
    /// Tamanho do chunk lido da serial
    pub chunk_size: usize,
}

impl Default for NovaConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(5),
            chunk_size: 128,
        }
    }
}

/// Sensor de partículas Nova SDS
///
/// Lê chunks de tamanho fixo diretamente (sem busca de sentinela), tratando
/// cada chunk como já alinhado, e faz a média de PM2.5/PM10 sobre todos os
/// chunks lidos dentro da janela.
pub struct NovaDriver {
    opener: Box<dyn StreamOpener>,
    config: NovaConfig,
    clock: Arc<dyn Clock>,
}

impl NovaDriver {
    pub fn new(opener: impl StreamOpener + 'static, config: NovaConfig) -> SensorResult<Self> {
        if config.chunk_size < NovaSample::MIN_CHUNK_LEN {
            return Err(SensorError::InvalidConfig(format!(
                "chunk size must be >= {}, got {}",
                NovaSample::MIN_CHUNK_LEN,
                config.chunk_size
            )));
        }

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

    pub fn config(&self) -> &NovaConfig {
        &self.config
    }

    fn average(&mut self) -> SensorResult<(NovaSample, u64)> {
        let mut stream = self.opener.open()?;
        let mut chunk = vec![0u8; self.config.chunk_size];

        // Primeira leitura com dados descartada (aquecimento / alinhamento)
        discard_first_chunk(&mut stream, &mut chunk)?;

        let mut average = ParticulateAverage::new();
        let window = SamplingWindow::open(self.config.window, self.clock.as_ref());

        while window.is_open() {
            let n = read_chunk(&mut stream, &mut chunk)?;
            match NovaSample::from_chunk(&chunk[..n]) {
                Ok(sample) => average.add(sample),
                Err(err) => trace!(bytes = n, error = %err, "skipping short chunk"),
            }
        }

        let sample = average.finish()?;
        Ok((sample, average.count()))
    }
}

fn read_chunk(stream: &mut dyn std::io::Read, chunk: &mut [u8]) -> SensorResult<usize> {
    loop {
        match stream.read(chunk) {
            Ok(n) => return Ok(n),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

fn discard_first_chunk(stream: &mut dyn std::io::Read, chunk: &mut [u8]) -> SensorResult<()> {
    for _ in 0..DEFAULT_MAX_IDLE_READS {
        let n = read_chunk(stream, chunk)?;
        if n > 0 {
            trace!(bytes = n, "discarded warm-up chunk");
            return Ok(());
        }
    }

    Err(SensorError::ReadFailure(format!(
        "stream produced no data after {} reads",
        DEFAULT_MAX_IDLE_READS
    )))
}

impl Driver for NovaDriver {
    fn name(&self) -> &str {
        "sds"
    }

    fn sensor(&self) -> SensorModel {
        SensorModel::Sds021
    }

    fn metrics(&self) -> &[Metric] {
        &METRICS
    }

    fn acquire(&mut self) -> SensorResult<Vec<Reading>> {
        let (sample, chunks) = self.average()?;
        let captured_at = chrono::Utc::now();

        debug!(pm25 = sample.pm25, pm10 = sample.pm10, chunks, "SDS reading");

        Ok(vec![
            Reading::at(self.sensor(), Metric::Pm25, sample.pm25, captured_at),
            Reading::at(self.sensor(), Metric::Pm10, sample.pm10, captured_at),
        ])
    }
}

impl std::fmt::Debug for NovaDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NovaDriver")
            .field("source", &self.opener.describe())
            .field("config", &self.config)
            .finish()
    }
}
