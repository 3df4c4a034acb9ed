//! Driver Plantower PMS5003 (variante com frames)

use airlog_core::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{verify_plantower_frame, PlantowerSample};

/// Tamanho do frame Plantower
pub const PLANTOWER_FRAME_LEN: usize = 32;

/// Primeiro byte de todo frame Plantower
pub const PLANTOWER_SENTINEL: u8 = 0x42;

const METRICS: [Metric; 3] = [Metric::Pm1, Metric::Pm25, Metric::Pm10];

/// Configuração do driver Plantower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantowerConfig {
    /// Tamanho do chunk lido da serial
    pub chunk_size: usize,
    /// Validar `0x4d` e checksum antes de aceitar o frame
    pub verify_checksum: bool,
    /// Frames inválidos tolerados antes de desistir (só com `verify_checksum`)
    pub max_frame_attempts: usize,
}

impl Default for PlantowerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 128,
            verify_checksum: false,
            max_frame_attempts: 4,
        }
    }
}

/// Sensor de partículas Plantower
///
/// Por ciclo: abre o stream, descarta o primeiro frame (pode ser o fragmento
/// de uma transmissão em andamento) e extrai PM1.0/PM2.5/PM10 do segundo.
pub struct PlantowerDriver {
    opener: Box<dyn StreamOpener>,
    config: PlantowerConfig,
}

impl PlantowerDriver {
    pub fn new(opener: impl StreamOpener + 'static, config: PlantowerConfig) -> SensorResult<Self> {
        if config.chunk_size == 0 {
            return Err(SensorError::InvalidConfig("chunk size must be > 0".into()));
        }

        if config.max_frame_attempts == 0 {
            return Err(SensorError::InvalidConfig(
                "max frame attempts must be > 0".into(),
            ));
        }

        Ok(Self {
            opener: Box::new(opener),
            config,
        })
    }

    pub fn config(&self) -> &PlantowerConfig {
        &self.config
    }

    fn read_sample(&mut self) -> SensorResult<PlantowerSample> {
        let stream = self.opener.open()?;
        let mut reader = FrameReader::with_chunk_size(
            stream,
            PLANTOWER_FRAME_LEN,
            PLANTOWER_SENTINEL,
            self.config.chunk_size,
        );

        // Primeiro frame do ciclo sempre descartado
        reader.next_frame()?;

        let attempts = if self.config.verify_checksum {
            self.config.max_frame_attempts
        } else {
            1
        };

        let mut last_error = None;
        for _ in 0..attempts {
            let frame = reader.next_frame()?;

            if self.config.verify_checksum {
                if let Err(err) = verify_plantower_frame(&frame) {
                    warn!(error = %err, "rejecting plantower frame");
                    last_error = Some(err);
                    continue;
                }
            }

            return Ok(PlantowerSample::from_frame(&frame)?);
        }

        Err(last_error
            .map(SensorError::from)
            .unwrap_or_else(|| SensorError::ParseFailure("no valid frame".into())))
    }
}

impl Driver for PlantowerDriver {
    fn name(&self) -> &str {
        "plantower"
    }

    fn sensor(&self) -> SensorModel {
        SensorModel::Pms5003
    }

    fn metrics(&self) -> &[Metric] {
        &METRICS
    }

    fn acquire(&mut self) -> SensorResult<Vec<Reading>> {
        let sample = self.read_sample()?;
        let captured_at = chrono::Utc::now();

        debug!(
            pm1 = sample.pm1,
            pm25 = sample.pm25,
            pm10 = sample.pm10,
            "PMS5003 reading"
        );

        Ok(vec![
            Reading::at(self.sensor(), Metric::Pm1, sample.pm1 as f64, captured_at),
            Reading::at(self.sensor(), Metric::Pm25, sample.pm25 as f64, captured_at),
            Reading::at(self.sensor(), Metric::Pm10, sample.pm10 as f64, captured_at),
        ])
    }
}

impl std::fmt::Debug for PlantowerDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantowerDriver")
            .field("source", &self.opener.describe())
            .field("config", &self.config)
            .finish()
    }
}
