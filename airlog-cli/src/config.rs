//! Deployment file (`airlog.toml`)
//!
//! Lists the sensors physically present and their parameters. Every section
//! has defaults matching the reference deployment: SDS on `/dev/ttyUSB0`,
//! DHT22 read through the Adafruit helper on GPIO 4, microphone fed as raw
//! S16LE PCM.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::publish::DEFAULT_ENDPOINT;

/// Full deployment configuration
///
/// A missing sensor section means that sensor is not installed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Nova SDS (unframed)
    pub sds: Option<NovaSection>,
    /// Plantower PMS (framed)
    pub pms: Option<PlantowerSection>,
    pub dht: Option<ClimateSection>,
    pub microphone: Option<MicrophoneSection>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            telemetry: TelemetryConfig::default(),
            sds: Some(NovaSection::default()),
            pms: None,
            dht: Some(ClimateSection::default()),
            microphone: Some(MicrophoneSection::default()),
        }
    }
}

impl DeploymentConfig {
    /// Parse from TOML text
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse deployment file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file path
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_str(&content).with_context(|| format!("Invalid deployment file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.sds.is_none() && self.pms.is_none() && self.dht.is_none() && self.microphone.is_none()
        {
            bail!("No sensors configured");
        }

        if let Some(sds) = &self.sds {
            if sds.window_secs == 0 {
                bail!("[sds] window_secs must be > 0");
            }
        }

        if let Some(mic) = &self.microphone {
            if mic.window_secs == 0 {
                bail!("[microphone] window_secs must be > 0");
            }
        }

        Ok(())
    }

    /// Serialize to TOML
    pub fn to_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize deployment file")
    }
}

/// Where readings are posted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub endpoint: String,
    pub device: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            device: None,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Serial link parameters, 8N1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSection {
    pub port: String,
    pub baud_rate: u32,
    pub timeout_secs: u64,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
            timeout_secs: 10,
        }
    }
}

impl SerialSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NovaSection {
    #[serde(flatten)]
    pub serial: SerialSection,
    pub window_secs: u64,
    pub chunk_size: usize,
}

impl Default for NovaSection {
    fn default() -> Self {
        Self {
            serial: SerialSection::default(),
            window_secs: 5,
            chunk_size: 128,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantowerSection {
    #[serde(flatten)]
    pub serial: SerialSection,
    pub chunk_size: usize,
    pub verify_checksum: bool,
}

impl Default for PlantowerSection {
    fn default() -> Self {
        Self {
            serial: SerialSection {
                port: "/dev/ttyAMA0".to_string(),
                ..SerialSection::default()
            },
            chunk_size: 128,
            verify_checksum: false,
        }
    }
}

/// DHT acquisition strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClimateSection {
    /// `"<temperature> <humidity>"` lines over a serial link
    Stream {
        #[serde(flatten)]
        serial: SerialSection,
        #[serde(default = "default_max_line_len")]
        max_line_len: usize,
    },
    /// Helper program printing `Temp=..*  Humidity=..%`
    Command { program: PathBuf, args: Vec<String> },
}

impl Default for ClimateSection {
    fn default() -> Self {
        ClimateSection::Command {
            program: PathBuf::from("AdafruitDHT.py"),
            args: vec!["2302".to_string(), "4".to_string()],
        }
    }
}

fn default_max_line_len() -> usize {
    256
}

/// Audio capture backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum AudioSource {
    /// Raw S16LE from a file, FIFO or device node (e.g. fed by `arecord`)
    Pcm { path: PathBuf },
    /// Direct ALSA capture; needs the `alsa` feature
    Alsa { device: String },
}

impl Default for AudioSource {
    fn default() -> Self {
        AudioSource::Pcm {
            path: PathBuf::from("/run/airlog/mic.pcm"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MicrophoneSection {
    pub source: AudioSource,
    pub sample_rate: u32,
    pub channels: u8,
    pub block_size: usize,
    pub window_secs: u64,
    pub noise_floor: f64,
    pub normalization_offset: f64,
}

impl Default for MicrophoneSection {
    fn default() -> Self {
        Self {
            source: AudioSource::default(),
            sample_rate: 44100,
            channels: 1,
            block_size: 8000,
            window_secs: 5,
            noise_floor: airlog_acoustic::types::DEFAULT_NOISE_FLOOR,
            normalization_offset: airlog_acoustic::types::DEFAULT_NORMALIZATION_OFFSET,
        }
    }
}
