//! Captura direta de um dispositivo ALSA (`hw:1,0`, S16, intercalado)

use alsa::pcm::{Access, Format, HwParams, PCM};
use alsa::{Direction, ValueOr};

use crate::error::{AcousticError, AcousticResult};
use crate::source::SampleSource;

/// Dispositivo de captura ALSA aberto para um ciclo
pub struct AlsaCapture {
    pcm: PCM,
    channels: usize,
}

impl AlsaCapture {
    pub fn open(device: &str, sample_rate: u32, channels: u8) -> AcousticResult<Self> {
        let open_err = |e: alsa::Error| AcousticError::DeviceOpenFailed(format!("{}: {}", device, e));

        let pcm = PCM::new(device, Direction::Capture, false).map_err(open_err)?;
        {
            let hwp = HwParams::any(&pcm).map_err(open_err)?;
            hwp.set_channels(channels as u32).map_err(open_err)?;
            hwp.set_rate(sample_rate, ValueOr::Nearest).map_err(open_err)?;
            hwp.set_format(Format::s16()).map_err(open_err)?;
            hwp.set_access(Access::RWInterleaved).map_err(open_err)?;
            pcm.hw_params(&hwp).map_err(open_err)?;
        }

        Ok(Self {
            pcm,
            channels: channels.max(1) as usize,
        })
    }
}

impl SampleSource for AlsaCapture {
    fn read_samples(&mut self, buf: &mut [i16]) -> AcousticResult<usize> {
        let io = self
            .pcm
            .io_i16()
            .map_err(|e| AcousticError::CaptureFailed(e.to_string()))?;

        match io.readi(buf) {
            Ok(frames) => Ok(frames * self.channels),
            Err(err) => {
                // Overrun: recupera e devolve um bloco vazio (transitório)
                self.pcm
                    .try_recover(err, true)
                    .map_err(|e| AcousticError::CaptureFailed(e.to_string()))?;
                Ok(0)
            }
        }
    }
}

impl std::fmt::Debug for AlsaCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlsaCapture")
            .field("channels", &self.channels)
            .finish()
    }
}
