//! Leituras escalares e o conjunto produzido por ciclo

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Instante de captura (UTC)
pub type Timestamp = DateTime<Utc>;

/// Tipo de medida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// PM1.0 em µg/m³
    Pm1,
    /// PM2.5 em µg/m³
    Pm25,
    /// PM10 em µg/m³
    Pm10,
    Temperature,
    Humidity,
    /// Nível sonoro em dB equivalente
    SoundLevel,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Pm1,
        Metric::Pm25,
        Metric::Pm10,
        Metric::Temperature,
        Metric::Humidity,
        Metric::SoundLevel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Pm1 => "PM1",
            Metric::Pm25 => "PM2.5",
            Metric::Pm10 => "PM10",
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::SoundLevel => "sound level",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Modelo do sensor que produziu a leitura
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorModel {
    /// Nova SDS011/SDS018/SDS021 (frames de 10 bytes, sem sentinela)
    Sds021,
    /// Plantower PMS5003 (frames de 32 bytes iniciados em 0x42)
    Pms5003,
    /// DHT22 / AM2302
    Dht22,
    /// Microfone de captura ALSA/PCM
    Microphone,
}

impl SensorModel {
    pub fn label(&self) -> &'static str {
        match self {
            SensorModel::Sds021 => "SDS021",
            SensorModel::Pms5003 => "PMS5003",
            SensorModel::Dht22 => "DHT22",
            SensorModel::Microphone => "Microphone",
        }
    }
}

impl fmt::Display for SensorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Uma medida escalar com timestamp. Imutável depois de produzida.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    metric: Metric,
    sensor: SensorModel,
    value: f64,
    captured_at: Timestamp,
}

impl Reading {
    /// Cria leitura capturada agora
    pub fn new(sensor: SensorModel, metric: Metric, value: f64) -> Self {
        Self::at(sensor, metric, value, Utc::now())
    }

    /// Cria leitura com instante de captura explícito
    pub fn at(sensor: SensorModel, metric: Metric, value: f64, captured_at: Timestamp) -> Self {
        Self {
            metric,
            sensor,
            value,
            captured_at,
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn sensor(&self) -> SensorModel {
        self.sensor
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn captured_at(&self) -> Timestamp {
        self.captured_at
    }
}

/// Métrica → zero ou uma leitura, produzido uma vez por ciclo
///
/// Uma métrica ausente significa que o driver falhou ou que o sensor não faz
/// parte desta instalação.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingSet {
    readings: BTreeMap<Metric, Reading>,
}

impl ReadingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere a leitura, devolvendo a anterior da mesma métrica, se houver
    pub fn insert(&mut self, reading: Reading) -> Option<Reading> {
        self.readings.insert(reading.metric(), reading)
    }

    pub fn get(&self, metric: Metric) -> Option<&Reading> {
        self.readings.get(&metric)
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.readings.contains_key(&metric)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Métricas presentes, em ordem estável
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.readings.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.values()
    }
}

impl FromIterator<Reading> for ReadingSet {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        let mut set = ReadingSet::new();
        for reading in iter {
            set.insert(reading);
        }
        set
    }
}

impl Extend<Reading> for ReadingSet {
    fn extend<I: IntoIterator<Item = Reading>>(&mut self, iter: I) {
        for reading in iter {
            self.insert(reading);
        }
    }
}
