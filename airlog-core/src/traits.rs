//! # 🎯 Traits — Abstrações de Aquisição
//!
//! | Trait | Papel |
//! |:------|:------|
//! | [`StreamOpener`] | Abre um stream de bytes novo para um ciclo |
//! | [`Driver`] | Produz as leituras de um sensor em um ciclo |
//!
//! > *"Trait no core, implementação no crate do sensor."*

use std::io::Read;

use crate::error::SensorResult;
use crate::reading::{Metric, Reading, SensorModel};

/// Abre o stream de bytes de um sensor
///
/// Cada chamada devolve um stream novo que é consumido por exatamente um
/// ciclo e liberado (drop) ao final, inclusive em caso de falha. Nenhum
/// estado de conexão sobrevive entre ciclos.
///
/// Closures `FnMut() -> SensorResult<Box<dyn Read>>` também são openers:
///
/// ```
/// use airlog_core::prelude::*;
/// use std::io::{Cursor, Read};
///
/// let mut opener = || -> SensorResult<Box<dyn Read>> {
///     Ok(Box::new(Cursor::new(vec![0x42, 0x4d])))
/// };
/// let mut stream = opener.open().unwrap();
/// let mut bytes = Vec::new();
/// stream.read_to_end(&mut bytes).unwrap();
/// assert_eq!(bytes, vec![0x42, 0x4d]);
/// ```
pub trait StreamOpener: Send {
    fn open(&mut self) -> SensorResult<Box<dyn Read>>;

    /// Descrição para logs (porta, caminho, ...)
    fn describe(&self) -> String {
        "stream".to_string()
    }
}

impl<F> StreamOpener for F
where
    F: FnMut() -> SensorResult<Box<dyn Read>> + Send,
{
    fn open(&mut self) -> SensorResult<Box<dyn Read>> {
        self()
    }
}

/// Driver de sensor
///
/// Um driver é executado exatamente uma vez por ciclo, em sua própria
/// tarefa. Em falha não produz leitura alguma (nunca uma leitura zero),
/// para que "sem dados" seja distinguível de "valor zero válido".
pub trait Driver: Send {
    /// Nome único do driver (para logs e relatórios)
    fn name(&self) -> &str;

    /// Modelo do sensor
    fn sensor(&self) -> SensorModel;

    /// Métricas que este driver produz
    fn metrics(&self) -> &[Metric];

    /// Executa um ciclo de aquisição
    fn acquire(&mut self) -> SensorResult<Vec<Reading>>;
}
