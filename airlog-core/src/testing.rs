//! Fontes de bytes roteirizadas
//!
//! Substituem portas seriais em testes: cada chamada a `read` entrega o
//! próximo chunk do roteiro, do jeito que um UART entrega rajadas parciais.

use std::collections::VecDeque;
use std::io::{self, Read};

/// Passo do roteiro
#[derive(Debug, Clone)]
pub enum Step {
    /// Entrega estes bytes (truncados ao buffer do leitor)
    Chunk(Vec<u8>),
    /// Leitura vazia (timeout sem dados)
    Idle,
    /// Erro de I/O
    Fail(io::ErrorKind),
}

/// Leitor que reproduz um roteiro de chunks e depois reporta EOF
#[derive(Debug, Clone, Default)]
pub struct ScriptedReader {
    steps: VecDeque<Step>,
    reads: usize,
}

impl ScriptedReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roteiro só de chunks
    pub fn from_chunks<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        let mut reader = Self::new();
        for chunk in chunks {
            reader = reader.chunk(chunk);
        }
        reader
    }

    pub fn chunk(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.steps.push_back(Step::Chunk(bytes.into()));
        self
    }

    pub fn idle(mut self) -> Self {
        self.steps.push_back(Step::Idle);
        self
    }

    pub fn fail(mut self, kind: io::ErrorKind) -> Self {
        self.steps.push_back(Step::Fail(kind));
        self
    }

    /// Chamadas a `read` feitas até agora
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Read for ScriptedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        match self.steps.pop_front() {
            None | Some(Step::Idle) => Ok(0),
            Some(Step::Fail(kind)) => Err(io::Error::new(kind, "scripted failure")),
            Some(Step::Chunk(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    self.steps.push_front(Step::Chunk(bytes[n..].to_vec()));
                }
                Ok(n)
            }
        }
    }
}
