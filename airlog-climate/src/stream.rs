//! Protocolo textual `"<temperatura> <umidade>\n"`

use std::io::{BufRead, ErrorKind, Read};

use crate::error::{ClimateError, ClimateResult};
use crate::types::ClimateSample;

/// Interpreta uma linha com exatamente dois campos numéricos
pub fn parse_line(line: &str) -> ClimateResult<ClimateSample> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.len() != 2 {
        return Err(ClimateError::MalformedReading(format!(
            "expected 2 fields, got {} in {:?}",
            fields.len(),
            line.trim_end()
        )));
    }

    let number = |field: &str| {
        field.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| {
            ClimateError::MalformedReading(format!("{:?} is not a number", field))
        })
    };

    Ok(ClimateSample::new(number(fields[0])?, number(fields[1])?))
}

/// Lê uma linha de no máximo `max_len` bytes
///
/// Devolve `None` no fim do stream.
pub(crate) fn read_line<R: BufRead>(reader: &mut R, max_len: usize) -> ClimateResult<Option<String>> {
    let mut line = String::new();
    let n = loop {
        match reader.by_ref().take(max_len as u64).read_line(&mut line) {
            Ok(n) => break n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                return Err(ClimateError::MalformedReading(format!("line is not UTF-8: {}", err)));
            }
            Err(err) => return Err(ClimateError::SensorReadFailed(err.to_string())),
        }
    };

    if n == 0 {
        return Ok(None);
    }

    if n >= max_len && !line.ends_with('\n') {
        return Err(ClimateError::MalformedReading(format!(
            "line exceeds {} bytes",
            max_len
        )));
    }

    Ok(Some(line))
}

/// Pula bytes até o próximo `\n`, sem validar conteúdo nem tamanho
///
/// Devolve `false` no fim do stream.
pub(crate) fn skip_line<R: BufRead>(reader: &mut R) -> ClimateResult<bool> {
    loop {
        match reader.skip_until(b'\n') {
            Ok(n) => return Ok(n > 0),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(ClimateError::SensorReadFailed(err.to_string())),
        }
    }
}

/// Descarta a primeira linha e interpreta a segunda
///
/// A primeira linha pode ser um fragmento com ruído de abertura da porta.
pub fn read_sample<R: BufRead>(reader: &mut R, max_line_len: usize) -> ClimateResult<ClimateSample> {
    if !skip_line(reader)? {
        return Err(ClimateError::SensorReadFailed(
            "stream ended before the first line".into(),
        ));
    }

    let line = read_line(reader, max_line_len)?.ok_or_else(|| {
        ClimateError::SensorReadFailed("stream ended before the second line".into())
    })?;

    parse_line(&line)
}
