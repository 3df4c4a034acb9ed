//! # 🌡️ airlog-climate — Temperatura e Umidade
//!
//! Driver de umidade/temperatura (DHT22) com duas estratégias de aquisição,
//! escolhidas por configuração na partida:
//!
//! - **Stream**: texto orientado a linhas (`"<temperatura> <umidade>"`) vindo
//!   de uma serial. A primeira linha é sempre descartada (pode ter sido
//!   recebida pela metade); a segunda é interpretada.
//! - **Probe**: leitura nativa (biblioteca do sensor ou script auxiliar).
//!   Duas leituras sucessivas, a primeira descartada; a segunda é convertida
//!   de Celsius para Fahrenheit.
//!
//! O contrato é o mesmo nos dois casos: descartar-e-ler, um par de
//! leituras (temperatura, umidade) com um único timestamp por invocação.
//!
//! ## Exemplo
//!
//! ```ignore
//! use airlog_climate::{CommandProbe, HumidityDriver};
//!
//! let probe = CommandProbe::new("/opt/dht/AdafruitDHT.py", ["2302", "4"]);
//! let mut dht = HumidityDriver::probe(probe);
//! let readings = dht.acquire()?;
//! ```

pub mod driver;
pub mod error;
pub mod probe;
pub mod stream;
pub mod types;

pub use driver::{HumidityAcquisition, HumidityConfig, HumidityDriver};
pub use error::{ClimateError, ClimateResult};
pub use probe::{ClimateProbe, CommandProbe, parse_adafruit_output};
pub use stream::parse_line;
pub use types::{ClimateSample, celsius_to_fahrenheit};

// Re-exportar tipos do core
pub use airlog_core::prelude::*;
