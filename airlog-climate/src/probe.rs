//! Leitura nativa do DHT22
//!
//! Em hardware onde o sensor é lido por uma biblioteca nativa em vez de um
//! stream, a aquisição é abstraída por [`ClimateProbe`]. [`CommandProbe`]
//! executa o script auxiliar da Adafruit e interpreta sua saída.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{ClimateError, ClimateResult};
use crate::types::ClimateSample;

/// Uma leitura nativa do sensor, em °C e %UR
pub trait ClimateProbe: Send {
    fn read(&mut self) -> ClimateResult<ClimateSample>;

    /// Descrição para logs
    fn describe(&self) -> String {
        "probe".to_string()
    }
}

impl<F> ClimateProbe for F
where
    F: FnMut() -> ClimateResult<ClimateSample> + Send,
{
    fn read(&mut self) -> ClimateResult<ClimateSample> {
        self()
    }
}

/// Probe que executa um programa externo (ex.: `AdafruitDHT.py 2302 4`)
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandProbe {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl ClimateProbe for CommandProbe {
    fn read(&mut self) -> ClimateResult<ClimateSample> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| {
                ClimateError::CommandFailed(format!("{}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            return Err(ClimateError::CommandFailed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_adafruit_output(&String::from_utf8_lossy(&output.stdout))
    }

    fn describe(&self) -> String {
        self.program.display().to_string()
    }
}

/// Interpreta `Temp=23.4*  Humidity=45.6%`
pub fn parse_adafruit_output(output: &str) -> ClimateResult<ClimateSample> {
    let field = |key: &str, terminator: char| -> ClimateResult<f64> {
        let start = output.find(key).ok_or_else(|| {
            ClimateError::MalformedReading(format!("missing {:?} in {:?}", key, output.trim()))
        })? + key.len();

        let rest = &output[start..];
        let end = rest.find(terminator).unwrap_or(rest.len());

        rest[..end].trim().parse::<f64>().map_err(|_| {
            ClimateError::MalformedReading(format!("invalid {} value {:?}", key, &rest[..end]))
        })
    };

    Ok(ClimateSample::new(field("Temp=", '*')?, field("Humidity=", '%')?))
}
