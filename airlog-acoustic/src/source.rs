//! Fontes de amostras de áudio

use std::io::{ErrorKind, Read};

use crate::error::{AcousticError, AcousticResult};

/// Stream de amostras PCM de 16 bits com sinal
pub trait SampleSource {
    /// Preenche `buf` com até `buf.len()` amostras e devolve quantas leu.
    ///
    /// Zero amostras é transitório: o chamador tenta de novo dentro da janela.
    fn read_samples(&mut self, buf: &mut [i16]) -> AcousticResult<usize>;
}

/// Abre o dispositivo de captura para um ciclo
pub trait SampleOpener: Send {
    fn open(&mut self) -> AcousticResult<Box<dyn SampleSource>>;

    /// Descrição para logs
    fn describe(&self) -> String {
        "capture".to_string()
    }
}

impl<F> SampleOpener for F
where
    F: FnMut() -> AcousticResult<Box<dyn SampleSource>> + Send,
{
    fn open(&mut self) -> AcousticResult<Box<dyn SampleSource>> {
        self()
    }
}

/// Decodifica S16LE de qualquer `Read` (arquivo, FIFO, pipe do `arecord`)
#[derive(Debug)]
pub struct PcmReader<R> {
    inner: R,
    bytes: Vec<u8>,
    carry: Option<u8>,
}

impl<R: Read> PcmReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes: Vec::new(),
            carry: None,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> SampleSource for PcmReader<R> {
    fn read_samples(&mut self, buf: &mut [i16]) -> AcousticResult<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let want = buf.len() * 2;
        self.bytes.resize(want, 0);

        // Byte ímpar que sobrou da leitura anterior
        let start = match self.carry.take() {
            Some(byte) => {
                self.bytes[0] = byte;
                1
            }
            None => 0,
        };

        let n = loop {
            match self.inner.read(&mut self.bytes[start..want]) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.carry = (start == 1).then(|| self.bytes[0]);
                    return Err(AcousticError::CaptureFailed(err.to_string()));
                }
            }
        };

        let total = start + n;
        let samples = total / 2;

        for (slot, pair) in buf.iter_mut().zip(self.bytes[..samples * 2].chunks_exact(2)) {
            *slot = i16::from_le_bytes([pair[0], pair[1]]);
        }

        if total % 2 == 1 {
            self.carry = Some(self.bytes[total - 1]);
        }

        Ok(samples)
    }
}
