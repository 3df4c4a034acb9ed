//! Driver de umidade/temperatura implementando o trait Driver

use std::io::BufReader;

use airlog_core::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::probe::ClimateProbe;
use crate::stream::read_sample;
use crate::types::ClimateSample;

const METRICS: [Metric; 2] = [Metric::Temperature, Metric::Humidity];

/// Configuração do driver de clima
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumidityConfig {
    /// Maior linha aceita no protocolo textual
    pub max_line_len: usize,
}

impl Default for HumidityConfig {
    fn default() -> Self {
        Self { max_line_len: 256 }
    }
}

/// Estratégia de aquisição, escolhida na partida
pub enum HumidityAcquisition {
    /// Texto orientado a linhas vindo de um stream
    Stream(Box<dyn StreamOpener>),
    /// Leitura nativa em °C, convertida para °F
    Probe(Box<dyn ClimateProbe>),
}

impl HumidityAcquisition {
    fn describe(&self) -> String {
        match self {
            HumidityAcquisition::Stream(opener) => format!("stream {}", opener.describe()),
            HumidityAcquisition::Probe(probe) => format!("probe {}", probe.describe()),
        }
    }
}

/// Sensor DHT22
pub struct HumidityDriver {
    acquisition: HumidityAcquisition,
    config: HumidityConfig,
}

impl HumidityDriver {
    pub fn new(acquisition: HumidityAcquisition, config: HumidityConfig) -> SensorResult<Self> {
        if config.max_line_len < 4 {
            return Err(SensorError::InvalidConfig(format!(
                "max line length must be >= 4, got {}",
                config.max_line_len
            )));
        }

        Ok(Self {
            acquisition,
            config,
        })
    }

    /// Driver sobre stream textual com configuração padrão
    pub fn stream(opener: impl StreamOpener + 'static) -> Self {
        Self {
            acquisition: HumidityAcquisition::Stream(Box::new(opener)),
            config: HumidityConfig::default(),
        }
    }

    /// Driver sobre probe nativo com configuração padrão
    pub fn probe(probe: impl ClimateProbe + 'static) -> Self {
        Self {
            acquisition: HumidityAcquisition::Probe(Box::new(probe)),
            config: HumidityConfig::default(),
        }
    }

    fn read_sample(&mut self) -> SensorResult<ClimateSample> {
        match &mut self.acquisition {
            HumidityAcquisition::Stream(opener) => {
                let mut reader = BufReader::new(opener.open()?);
                Ok(read_sample(&mut reader, self.config.max_line_len)?)
            }
            HumidityAcquisition::Probe(probe) => {
                // Primeira leitura descartada
                probe.read()?;
                Ok(probe.read()?.to_fahrenheit())
            }
        }
    }
}

impl Driver for HumidityDriver {
    fn name(&self) -> &str {
        "dht"
    }

    fn sensor(&self) -> SensorModel {
        SensorModel::Dht22
    }

    fn metrics(&self) -> &[Metric] {
        &METRICS
    }

    fn acquire(&mut self) -> SensorResult<Vec<Reading>> {
        let sample = self.read_sample()?;
        // Timestamp depois da interpretação, não antes da leitura
        let captured_at = chrono::Utc::now();

        debug!(
            temperature = sample.temperature,
            humidity = sample.humidity,
            "DHT reading"
        );

        Ok(vec![
            Reading::at(self.sensor(), Metric::Temperature, sample.temperature, captured_at),
            Reading::at(self.sensor(), Metric::Humidity, sample.humidity, captured_at),
        ])
    }
}

impl std::fmt::Debug for HumidityDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HumidityDriver")
            .field("acquisition", &self.acquisition.describe())
            .field("config", &self.config)
            .finish()
    }
}
