//! # 🌬️ airlog-core
//!
//! Tipos e primitivas compartilhados por todos os drivers do airlog.
//!
//! > *"Cada driver abre seu stream, consome um ciclo e o libera."*
//!
//! ## Módulos
//!
//! - [`reading`]: `Reading`, `Metric`, `SensorModel` e `ReadingSet`
//! - [`frame`]: `FrameReader` — sincronização de frames binários em links seriais
//! - [`window`]: `SamplingWindow` e `Clock` — janelas de amostragem por tempo de parede
//! - [`traits`]: `Driver` e `StreamOpener`
//! - [`error`]: taxonomia de erros de sensor
//! - [`testing`]: fontes de bytes roteirizadas para testes
//!
//! ## Exemplo
//!
//! ```
//! use airlog_core::prelude::*;
//! use std::io::Cursor;
//!
//! let mut bytes = vec![0x13, 0x37];
//! bytes.extend([0x42; 4]);
//!
//! let mut reader = FrameReader::new(Cursor::new(bytes), 4, 0x42);
//! let frame = reader.next_frame().unwrap();
//! assert_eq!(frame.as_bytes(), &[0x42; 4]);
//! ```

pub mod error;
pub mod frame;
pub mod prelude;
pub mod reading;
pub mod testing;
pub mod traits;
pub mod window;

pub use error::{SensorError, SensorResult};
pub use frame::{Frame, FrameReader};
pub use reading::{Metric, Reading, ReadingSet, SensorModel, Timestamp};
pub use traits::{Driver, StreamOpener};
pub use window::{Clock, SamplingWindow, SteppedClock, SystemClock};

#[cfg(test)]
mod tests;
