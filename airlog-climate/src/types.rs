//! Tipos de dados climáticos

use serde::{Deserialize, Serialize};

/// Par temperatura/umidade de uma leitura
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateSample {
    /// Temperatura (unidade depende da estratégia de aquisição)
    pub temperature: f64,
    /// Umidade relativa (0.0 - 100.0)
    pub humidity: f64,
}

impl ClimateSample {
    pub fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Mesma amostra com a temperatura convertida de °C para °F
    pub fn to_fahrenheit(self) -> Self {
        Self {
            temperature: celsius_to_fahrenheit(self.temperature),
            humidity: self.humidity,
        }
    }
}

/// `F = C × 1.8 + 32`
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}
