//! Tipos de dados acústicos

use serde::{Deserialize, Serialize};

/// Piso de ruído padrão: amostras com `s² ≤ 1` representam silêncio
pub const DEFAULT_NOISE_FLOOR: f64 = 1.0;

/// Deslocamento padrão que leva a medida log de `s²` à base de tensão
pub const DEFAULT_NORMALIZATION_OFFSET: f64 = 20.0;

/// Amostra de áudio individual (16-bit PCM)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSample {
    pub value: i16,
}

impl AudioSample {
    pub fn new(value: i16) -> Self {
        Self { value }
    }

    /// Magnitude ao quadrado `s²`
    pub fn squared(&self) -> f64 {
        let v = self.value as f64;
        v * v
    }

    /// `20 · log10(s²)`, ou `None` se `s²` não passa do piso de ruído
    pub fn level_db(&self, noise_floor: f64) -> Option<f64> {
        let squared = self.squared();
        if squared <= noise_floor {
            return None;
        }
        Some(20.0 * squared.log10())
    }
}

/// Média acumulada de níveis em dB ao longo de uma janela
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecibelAccumulator {
    noise_floor: f64,
    sum: f64,
    count: u64,
    skipped: u64,
}

impl DecibelAccumulator {
    pub fn new(noise_floor: f64) -> Self {
        Self {
            noise_floor,
            sum: 0.0,
            count: 0,
            skipped: 0,
        }
    }

    pub fn push(&mut self, sample: i16) {
        match AudioSample::new(sample).level_db(self.noise_floor) {
            Some(level) => {
                self.sum += level;
                self.count += 1;
            }
            None => self.skipped += 1,
        }
    }

    pub fn push_block(&mut self, block: &[i16]) {
        for &sample in block {
            self.push(sample);
        }
    }

    /// Amostras acima do piso de ruído
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Amostras descartadas como silêncio
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// `soma / contador − offset`, ou `None` se nenhuma amostra contou
    pub fn mean(&self, offset: f64) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64 - offset)
    }
}

impl Default for DecibelAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_FLOOR)
    }
}
