//! Tipos de dados de material particulado

use airlog_core::Frame;
use serde::{Deserialize, Serialize};

use crate::error::{ParticulateError, ParticulateResult};

/// Concentrações de um frame Plantower (µg/m³, padrão CF=1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantowerSample {
    pub pm1: u16,
    pub pm25: u16,
    pub pm10: u16,
}

impl PlantowerSample {
    /// Offset de PM1.0 no frame
    pub const PM1_OFFSET: usize = 4;
    /// Offset de PM2.5 no frame
    pub const PM25_OFFSET: usize = 6;
    /// Offset de PM10 no frame
    pub const PM10_OFFSET: usize = 8;

    /// Extrai os campos big-endian de um frame de 32 bytes
    pub fn from_frame(frame: &Frame) -> ParticulateResult<Self> {
        let field = |offset: usize| {
            frame.be_u16(offset).ok_or_else(|| {
                ParticulateError::MalformedFrame(format!(
                    "frame of {} bytes has no field at offset {}",
                    frame.len(),
                    offset
                ))
            })
        };

        Ok(Self {
            pm1: field(Self::PM1_OFFSET)?,
            pm25: field(Self::PM25_OFFSET)?,
            pm10: field(Self::PM10_OFFSET)?,
        })
    }
}

/// Verifica cabeçalho `0x42 0x4d` e checksum de um frame Plantower
///
/// O checksum é a soma dos bytes `0..30`, comparada ao u16 big-endian
/// em `30..32`.
pub fn verify_plantower_frame(frame: &Frame) -> ParticulateResult<()> {
    let bytes = frame.as_bytes();
    if bytes.len() < 32 {
        return Err(ParticulateError::MalformedFrame(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }

    if bytes[1] != 0x4d {
        return Err(ParticulateError::MalformedFrame(format!(
            "second start byte is {:#04x}, expected 0x4d",
            bytes[1]
        )));
    }

    let computed = bytes[..30]
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(b as u16));
    let expected = u16::from_be_bytes([bytes[30], bytes[31]]);

    if computed != expected {
        return Err(ParticulateError::ChecksumMismatch { expected, computed });
    }

    Ok(())
}

/// Concentrações de um chunk Nova SDS (µg/m³, uma casa decimal)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NovaSample {
    pub pm25: f64,
    pub pm10: f64,
}

impl NovaSample {
    /// Menor chunk que contém os dois campos
    pub const MIN_CHUNK_LEN: usize = 6;

    /// Decodifica um chunk já alinhado: pares byte baixo/byte alto em
    /// `2..4` (PM2.5) e `4..6` (PM10), divididos por 10
    pub fn from_chunk(chunk: &[u8]) -> ParticulateResult<Self> {
        if chunk.len() < Self::MIN_CHUNK_LEN {
            return Err(ParticulateError::MalformedFrame(format!(
                "chunk of {} bytes is shorter than {}",
                chunk.len(),
                Self::MIN_CHUNK_LEN
            )));
        }

        let pm25 = u16::from_le_bytes([chunk[2], chunk[3]]);
        let pm10 = u16::from_le_bytes([chunk[4], chunk[5]]);

        Ok(Self {
            pm25: pm25 as f64 / 10.0,
            pm10: pm10 as f64 / 10.0,
        })
    }
}

/// Média acumulada de PM2.5/PM10 ao longo de uma janela
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParticulateAverage {
    pm25_sum: f64,
    pm10_sum: f64,
    count: u64,
}

impl ParticulateAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sample: NovaSample) {
        self.pm25_sum += sample.pm25;
        self.pm10_sum += sample.pm10;
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Média aritmética; falha se nenhum chunk foi acumulado
    pub fn finish(&self) -> ParticulateResult<NovaSample> {
        if self.count == 0 {
            return Err(ParticulateError::NoSamples);
        }

        let count = self.count as f64;
        Ok(NovaSample {
            pm25: self.pm25_sum / count,
            pm10: self.pm10_sum / count,
        })
    }
}
