//! Concrete bindings: serial ports, PCM capture, helper programs

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::time::Duration;

use airlog_acoustic::{
    AcousticError, AcousticLevelDriver, AcousticResult, AudioConfig, PcmReader, SampleOpener,
    SampleSource,
};
use airlog_climate::{CommandProbe, HumidityAcquisition, HumidityConfig, HumidityDriver};
use airlog_core::prelude::*;
use airlog_particulate::{NovaConfig, NovaDriver, PlantowerConfig, PlantowerDriver};
use anyhow::{Context, Result};
use serialport::{DataBits, FlowControl, Parity, StopBits};
use tracing::debug;

use crate::config::{AudioSource, ClimateSection, DeploymentConfig, MicrophoneSection, SerialSection};

/// Serial port opened fresh for every cycle, 8N1, no flow control
#[derive(Debug, Clone)]
pub struct SerialOpener {
    port: String,
    baud_rate: u32,
    timeout: Duration,
}

impl SerialOpener {
    pub fn new(port: impl Into<String>, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            timeout,
        }
    }

    pub fn from_section(section: &SerialSection) -> Self {
        Self::new(&section.port, section.baud_rate, section.timeout())
    }
}

impl StreamOpener for SerialOpener {
    fn open(&mut self) -> SensorResult<Box<dyn Read>> {
        let port = serialport::new(&self.port, self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.timeout)
            .open()
            .map_err(|e| SensorError::ReadFailure(format!("{}: {}", self.port, e)))?;

        debug!(port = %self.port, baud = self.baud_rate, "Serial port opened");
        Ok(Box::new(port))
    }

    fn describe(&self) -> String {
        format!("{}@{}", self.port, self.baud_rate)
    }
}

/// Raw S16LE from a path (capture device node, FIFO or file)
#[derive(Debug, Clone)]
pub struct PcmFileOpener {
    path: PathBuf,
}

impl PcmFileOpener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleOpener for PcmFileOpener {
    fn open(&mut self) -> AcousticResult<Box<dyn SampleSource>> {
        let file = File::open(&self.path).map_err(|e| {
            AcousticError::DeviceOpenFailed(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(Box::new(PcmReader::new(BufReader::new(file))))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// ALSA capture device opened per cycle
#[cfg(feature = "alsa")]
#[derive(Debug, Clone)]
pub struct AlsaOpener {
    device: String,
    sample_rate: u32,
    channels: u8,
}

#[cfg(feature = "alsa")]
impl SampleOpener for AlsaOpener {
    fn open(&mut self) -> AcousticResult<Box<dyn SampleSource>> {
        let capture =
            airlog_acoustic::AlsaCapture::open(&self.device, self.sample_rate, self.channels)?;
        Ok(Box::new(capture))
    }

    fn describe(&self) -> String {
        format!("alsa {}", self.device)
    }
}

/// Instantiates one driver per configured sensor
pub fn build_drivers(config: &DeploymentConfig) -> Result<Vec<Box<dyn Driver>>> {
    let mut drivers: Vec<Box<dyn Driver>> = Vec::new();

    if let Some(pms) = &config.pms {
        let driver = PlantowerDriver::new(
            SerialOpener::from_section(&pms.serial),
            PlantowerConfig {
                chunk_size: pms.chunk_size,
                verify_checksum: pms.verify_checksum,
                ..PlantowerConfig::default()
            },
        )
        .context("Invalid [pms] section")?;
        drivers.push(Box::new(driver));
    }

    if let Some(sds) = &config.sds {
        let driver = NovaDriver::new(
            SerialOpener::from_section(&sds.serial),
            NovaConfig {
                window: Duration::from_secs(sds.window_secs),
                chunk_size: sds.chunk_size,
            },
        )
        .context("Invalid [sds] section")?;
        drivers.push(Box::new(driver));
    }

    if let Some(dht) = &config.dht {
        let driver = match dht {
            ClimateSection::Stream {
                serial,
                max_line_len,
            } => HumidityDriver::new(
                HumidityAcquisition::Stream(Box::new(SerialOpener::from_section(serial))),
                HumidityConfig {
                    max_line_len: *max_line_len,
                },
            )
            .context("Invalid [dht] section")?,
            ClimateSection::Command { program, args } => {
                HumidityDriver::probe(CommandProbe::new(program, args))
            }
        };
        drivers.push(Box::new(driver));
    }

    if let Some(mic) = &config.microphone {
        drivers.push(build_microphone(mic)?);
    }

    Ok(drivers)
}

fn build_microphone(mic: &MicrophoneSection) -> Result<Box<dyn Driver>> {
    let audio = AudioConfig {
        sample_rate: mic.sample_rate,
        channels: mic.channels,
        block_size: mic.block_size,
        window: Duration::from_secs(mic.window_secs),
        noise_floor: mic.noise_floor,
        normalization_offset: mic.normalization_offset,
    };

    match &mic.source {
        AudioSource::Pcm { path } => acoustic_driver(PcmFileOpener::new(path), audio),
        #[cfg(feature = "alsa")]
        AudioSource::Alsa { device } => acoustic_driver(
            AlsaOpener {
                device: device.clone(),
                sample_rate: mic.sample_rate,
                channels: mic.channels,
            },
            audio,
        ),
        #[cfg(not(feature = "alsa"))]
        AudioSource::Alsa { device } => anyhow::bail!(
            "Microphone backend 'alsa' ({}) requires building airlog with the `alsa` feature",
            device
        ),
    }
}

fn acoustic_driver(opener: impl SampleOpener + 'static, audio: AudioConfig) -> Result<Box<dyn Driver>> {
    let driver = AcousticLevelDriver::new(opener, audio).context("Invalid [microphone] section")?;
    Ok(Box::new(driver))
}
