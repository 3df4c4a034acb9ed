//! # Prelude — Re-exportações Convenientes
//!
//! ```
//! use airlog_core::prelude::*;
//! ```

// Leituras
pub use crate::reading::{Metric, Reading, ReadingSet, SensorModel, Timestamp};

// Erros
pub use crate::error::{SensorError, SensorResult};

// Aquisição
pub use crate::frame::{Frame, FrameReader};
pub use crate::traits::{Driver, StreamOpener};
pub use crate::window::{Clock, SamplingWindow, SteppedClock, SystemClock};
