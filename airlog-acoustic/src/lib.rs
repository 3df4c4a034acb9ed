//! # 🎤 airlog-acoustic — Nível Sonoro
//!
//! Consome um stream contínuo de amostras PCM de 16 bits com sinal,
//! converte cada amostra em uma magnitude equivalente em decibéis e acumula
//! a média ao longo de uma janela de tempo fixa.
//!
//! ## Redução
//!
//! Para cada amostra `s` com `s² > piso de ruído`:
//!
//! ```text
//! soma += 20 · log10(s²)        contador += 1
//! ```
//!
//! No fim da janela: `nível = soma / contador − deslocamento`. Com os
//! valores padrão (`piso = 1`, `deslocamento = 20`) o resultado é
//! comparável entre ciclos, mas não é calibrado contra um SPL de referência.
//!
//! ## Exemplo
//!
//! ```ignore
//! use airlog_acoustic::{AcousticLevelDriver, AudioConfig, PcmReader};
//!
//! let opener = || Ok(Box::new(PcmReader::new(File::open("/run/airlog/mic.pcm")?)) as _);
//! let mut mic = AcousticLevelDriver::new(opener, AudioConfig::default())?;
//! let readings = mic.acquire()?;
//! ```

pub mod error;
pub mod microphone;
pub mod source;
pub mod types;

#[cfg(feature = "alsa")]
pub mod alsa;

pub use error::{AcousticError, AcousticResult};
pub use microphone::{AcousticLevelDriver, AudioConfig};
pub use source::{PcmReader, SampleOpener, SampleSource};
pub use types::{AudioSample, DecibelAccumulator};

#[cfg(feature = "alsa")]
pub use alsa::AlsaCapture;

// Re-export core types
pub use airlog_core::prelude::*;
