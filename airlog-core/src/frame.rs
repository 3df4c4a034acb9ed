//! # FrameReader — Sincronização de Frames
//!
//! Monta frames de tamanho fixo a partir de um stream de bytes não confiável
//! (porta serial aberta no meio de uma transmissão, leituras parciais).
//!
//! ```text
//!  chunk 1: .. 1f 00 7a | 42 4d 00 1c ..     descarta até a sentinela
//!  chunk 2: .. .. .. .. .. .. .. ..          acumula no buffer
//!  chunk 3: .. .. .. .. | lixo               trunca em L bytes
//! ```
//!
//! O buffer do frame pertence exclusivamente a uma instância de
//! `FrameReader` e é esvaziado a cada ressincronização ou frame consumido.

use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::error::{SensorError, SensorResult};

/// Tamanho padrão do chunk de leitura (bytes)
pub const DEFAULT_CHUNK_SIZE: usize = 128;

/// Leituras vazias consecutivas toleradas antes de considerar o stream esgotado
pub const DEFAULT_MAX_IDLE_READS: usize = 64;

/// Um registro binário completo de tamanho fixo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// u16 big-endian em `offset..offset + 2`
    pub fn be_u16(&self, offset: usize) -> Option<u16> {
        let pair = self.bytes.get(offset..offset + 2)?;
        Some(u16::from_be_bytes([pair[0], pair[1]]))
    }
}

/// Leitor de frames com ressincronização por byte sentinela
#[derive(Debug)]
pub struct FrameReader<R> {
    source: R,
    frame_len: usize,
    sentinel: u8,
    scratch: Vec<u8>,
    buffer: Vec<u8>,
    max_idle_reads: usize,
    discarded: usize,
}

impl<R: Read> FrameReader<R> {
    /// Cria leitor com chunk padrão de 128 bytes
    pub fn new(source: R, frame_len: usize, sentinel: u8) -> Self {
        Self::with_chunk_size(source, frame_len, sentinel, DEFAULT_CHUNK_SIZE)
    }

    /// Cria leitor com tamanho de chunk específico
    pub fn with_chunk_size(source: R, frame_len: usize, sentinel: u8, chunk_size: usize) -> Self {
        Self {
            source,
            frame_len,
            sentinel,
            scratch: vec![0; chunk_size.max(1)],
            buffer: Vec::with_capacity(frame_len + chunk_size),
            max_idle_reads: DEFAULT_MAX_IDLE_READS,
            discarded: 0,
        }
    }

    /// Limite de leituras vazias consecutivas (EOF ou timeout sem dados)
    pub fn with_max_idle_reads(mut self, max_idle_reads: usize) -> Self {
        self.max_idle_reads = max_idle_reads.max(1);
        self
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn sentinel(&self) -> u8 {
        self.sentinel
    }

    /// Total de bytes descartados durante ressincronizações e truncamentos
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Lê o próximo frame completo de `frame_len` bytes
    ///
    /// Não há retentativa interna: qualquer erro do stream é `ReadFailure`.
    pub fn next_frame(&mut self) -> SensorResult<Frame> {
        if self.frame_len == 0 {
            return Err(SensorError::InvalidConfig("frame length must be > 0".into()));
        }

        let mut idle_reads = 0;

        loop {
            let n = match self.source.read(&mut self.scratch) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.reset();
                    return Err(SensorError::ReadFailure(err.to_string()));
                }
            };

            if n == 0 {
                idle_reads += 1;
                if idle_reads >= self.max_idle_reads {
                    self.reset();
                    return Err(SensorError::ReadFailure(format!(
                        "stream produced no data after {} reads",
                        idle_reads
                    )));
                }
                continue;
            }
            idle_reads = 0;

            let chunk = &self.scratch[..n];

            if self.buffer.is_empty() {
                match chunk.iter().position(|&b| b == self.sentinel) {
                    Some(start) => {
                        self.discarded += start;
                        self.buffer.extend_from_slice(&chunk[start..]);
                    }
                    None => {
                        self.discarded += n;
                        trace!(bytes = n, "no sentinel in chunk, resynchronizing");
                        continue;
                    }
                }
            } else {
                self.buffer.extend_from_slice(chunk);
            }

            if self.buffer.len() >= self.frame_len {
                self.discarded += self.buffer.len() - self.frame_len;
                let bytes = self.buffer[..self.frame_len].to_vec();
                self.buffer.clear();
                return Ok(Frame::new(bytes));
            }
        }
    }

    /// Esvazia o buffer do frame, forçando ressincronização na próxima leitura
    pub fn reset(&mut self) {
        self.discarded += self.buffer.len();
        self.buffer.clear();
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}
