//! # 🌫️ airlog-particulate — Material Particulado
//!
//! Drivers para sensores de partículas ligados por serial. Os dois modelos
//! compartilham o padrão "ler bytes crus, extrair campos de 16 bits em
//! offsets fixos", mas diferem na disciplina de framing:
//!
//! | Driver | Sensor | Framing | Campos |
//! |:-------|:-------|:--------|:-------|
//! | [`PlantowerDriver`] | PMS5003 | 32 bytes, sentinela `0x42` | PM1.0 `4..6`, PM2.5 `6..8`, PM10 `8..10` (BE) |
//! | [`NovaDriver`] | SDS011/SDS021 | chunks de 128 bytes já alinhados | PM2.5 `2..4`, PM10 `4..6` (byte baixo primeiro, ÷10) |
//!
//! Ambos descartam a primeira leitura bem-sucedida (aquecimento do sensor /
//! alinhamento do stream) antes de acumular.
//!
//! ## Exemplo
//!
//! ```ignore
//! use airlog_particulate::{NovaConfig, NovaDriver};
//! use airlog_core::prelude::*;
//!
//! let mut sds = NovaDriver::new(opener, NovaConfig::default())?;
//! let readings = sds.acquire()?;
//! ```

pub mod error;
pub mod nova;
pub mod plantower;
pub mod types;

pub use error::{ParticulateError, ParticulateResult};
pub use nova::{NovaConfig, NovaDriver};
pub use plantower::{PlantowerConfig, PlantowerDriver};
pub use types::{NovaSample, ParticulateAverage, PlantowerSample};

// Re-export core types
pub use airlog_core::prelude::*;

#[cfg(test)]
mod tests;
