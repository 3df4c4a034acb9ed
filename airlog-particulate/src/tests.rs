//! Testes do módulo airlog-particulate

use super::*;
use airlog_core::testing::ScriptedReader;
use std::io::{ErrorKind, Read};
use std::sync::Arc;
use std::time::Duration;

fn plantower_frame(pm1: u16, pm25: u16, pm10: u16) -> Vec<u8> {
    let mut frame = vec![0u8; 32];
    frame[0] = 0x42;
    frame[1] = 0x4d;
    frame[2..4].copy_from_slice(&28u16.to_be_bytes());
    frame[4..6].copy_from_slice(&pm1.to_be_bytes());
    frame[6..8].copy_from_slice(&pm25.to_be_bytes());
    frame[8..10].copy_from_slice(&pm10.to_be_bytes());
    let checksum = frame[..30].iter().map(|&b| b as u16).sum::<u16>();
    frame[30..32].copy_from_slice(&checksum.to_be_bytes());
    frame
}

fn nova_chunk(pm25_raw: u16, pm10_raw: u16) -> Vec<u8> {
    let mut chunk = vec![0u8; 128];
    chunk[0] = 0xaa;
    chunk[1] = 0xc0;
    chunk[2..4].copy_from_slice(&pm25_raw.to_le_bytes());
    chunk[4..6].copy_from_slice(&pm10_raw.to_le_bytes());
    chunk
}

fn scripted(reader: ScriptedReader) -> impl StreamOpener + 'static {
    let mut reader = Some(reader);
    move || -> SensorResult<Box<dyn Read>> {
        reader
            .take()
            .map(|r| Box::new(r) as Box<dyn Read>)
            .ok_or_else(|| SensorError::ReadFailure("already opened".into()))
    }
}

/// Relógio em que a janela fica aberta por exatamente `n` leituras
fn window_of(n: u32) -> (Arc<SteppedClock>, Duration) {
    let step = Duration::from_millis(1);
    (Arc::new(SteppedClock::new(step)), step * (n + 1))
}

fn value_of(readings: &[Reading], metric: Metric) -> Option<f64> {
    readings.iter().find(|r| r.metric() == metric).map(|r| r.value())
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES DE PLANTOWER
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_plantower_discards_first_frame() {
    let source = ScriptedReader::from_chunks([
        plantower_frame(99, 99, 99),
        plantower_frame(8, 12, 15),
    ]);

    let mut driver = PlantowerDriver::new(scripted(source), PlantowerConfig::default()).unwrap();
    let readings = driver.acquire().unwrap();

    assert_eq!(readings.len(), 3);
    assert_eq!(value_of(&readings, Metric::Pm1), Some(8.0));
    assert_eq!(value_of(&readings, Metric::Pm25), Some(12.0));
    assert_eq!(value_of(&readings, Metric::Pm10), Some(15.0));
    assert!(readings.iter().all(|r| r.sensor() == SensorModel::Pms5003));
    assert!(readings.windows(2).all(|w| w[0].captured_at() == w[1].captured_at()));
}

#[test]
fn test_plantower_truncated_leading_fragment() {
    let first = plantower_frame(1, 1, 1);
    let second = plantower_frame(20, 30, 40);

    // Porta aberta no meio de uma transmissão
    let source = ScriptedReader::new()
        .chunk(vec![0x00, 0x1e, 0x00, 0x05])
        .chunk(first)
        .chunk(second);

    let mut driver = PlantowerDriver::new(scripted(source), PlantowerConfig::default()).unwrap();
    let readings = driver.acquire().unwrap();
    assert_eq!(value_of(&readings, Metric::Pm25), Some(30.0));
    assert_eq!(value_of(&readings, Metric::Pm10), Some(40.0));
}

#[test]
fn test_plantower_checksum_rejects_corrupt_frame() {
    let mut corrupt = plantower_frame(5, 5, 5);
    corrupt[7] ^= 0x10;

    let source = ScriptedReader::from_chunks([
        plantower_frame(0, 0, 0),
        corrupt,
        plantower_frame(6, 7, 8),
    ]);

    let config = PlantowerConfig {
        verify_checksum: true,
        ..PlantowerConfig::default()
    };
    let mut driver = PlantowerDriver::new(scripted(source), config).unwrap();
    let readings = driver.acquire().unwrap();
    assert_eq!(value_of(&readings, Metric::Pm25), Some(7.0));
}

#[test]
fn test_plantower_checksum_exhausts_attempts() {
    let mut corrupt = plantower_frame(5, 5, 5);
    corrupt[31] ^= 0xff;

    let source = ScriptedReader::from_chunks([plantower_frame(0, 0, 0), corrupt.clone(), corrupt]);
    let config = PlantowerConfig {
        verify_checksum: true,
        max_frame_attempts: 2,
        ..PlantowerConfig::default()
    };

    let mut driver = PlantowerDriver::new(scripted(source), config).unwrap();
    assert!(matches!(driver.acquire(), Err(SensorError::ParseFailure(_))));
}

#[test]
fn test_plantower_io_error_yields_no_reading() {
    let source = ScriptedReader::new()
        .chunk(plantower_frame(1, 2, 3))
        .fail(ErrorKind::TimedOut);

    let mut driver = PlantowerDriver::new(scripted(source), PlantowerConfig::default()).unwrap();
    assert!(matches!(driver.acquire(), Err(SensorError::ReadFailure(_))));
}

#[test]
fn test_plantower_open_failure() {
    let opener = || -> SensorResult<Box<dyn Read>> {
        Err(SensorError::ReadFailure("/dev/ttyUSB1: no such device".into()))
    };
    let mut driver = PlantowerDriver::new(opener, PlantowerConfig::default()).unwrap();
    assert!(matches!(driver.acquire(), Err(SensorError::ReadFailure(_))));
}

#[test]
fn test_plantower_invalid_config() {
    let config = PlantowerConfig {
        chunk_size: 0,
        ..PlantowerConfig::default()
    };
    let opener = || -> SensorResult<Box<dyn Read>> { unreachable!() };
    assert!(PlantowerDriver::new(opener, config).is_err());
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES DE NOVA SDS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_nova_average_is_arithmetic_mean_over_ten() {
    let pm25_raw = [120u16, 135, 150, 101];
    let pm10_raw = [200u16, 210, 190, 240];

    // Primeiro chunk (descartado) com valores absurdos
    let mut chunks = vec![nova_chunk(9999, 9999)];
    chunks.extend(pm25_raw.iter().zip(&pm10_raw).map(|(&a, &b)| nova_chunk(a, b)));

    let (clock, window) = window_of(pm25_raw.len() as u32);
    let config = NovaConfig {
        window,
        ..NovaConfig::default()
    };

    let mut driver = NovaDriver::new(scripted(ScriptedReader::from_chunks(chunks)), config)
        .unwrap()
        .with_clock(clock);
    let readings = driver.acquire().unwrap();

    let expected_pm25 = pm25_raw.iter().map(|&v| v as f64).sum::<f64>() / 4.0 / 10.0;
    let expected_pm10 = pm10_raw.iter().map(|&v| v as f64).sum::<f64>() / 4.0 / 10.0;

    assert!((value_of(&readings, Metric::Pm25).unwrap() - expected_pm25).abs() < 1e-9);
    assert!((value_of(&readings, Metric::Pm10).unwrap() - expected_pm10).abs() < 1e-9);
    assert!(readings.iter().all(|r| r.sensor() == SensorModel::Sds021));
}

#[test]
fn test_nova_zero_chunks_fails_instead_of_dividing_by_zero() {
    let (clock, window) = window_of(0);
    let config = NovaConfig {
        window,
        ..NovaConfig::default()
    };

    let source = ScriptedReader::from_chunks([nova_chunk(100, 100), nova_chunk(100, 100)]);
    let mut driver = NovaDriver::new(scripted(source), config)
        .unwrap()
        .with_clock(clock);

    assert!(matches!(
        driver.acquire(),
        Err(SensorError::InsufficientSamples(_))
    ));
}

#[test]
fn test_nova_idle_reads_do_not_count_as_discarded_chunk() {
    let (clock, window) = window_of(1);
    let config = NovaConfig {
        window,
        ..NovaConfig::default()
    };

    // O chunk de aquecimento chega depois de leituras vazias
    let source = ScriptedReader::new()
        .idle()
        .idle()
        .chunk(nova_chunk(9999, 9999))
        .chunk(nova_chunk(100, 200));

    let mut driver = NovaDriver::new(scripted(source), config)
        .unwrap()
        .with_clock(clock);
    let readings = driver.acquire().unwrap();

    assert!((value_of(&readings, Metric::Pm25).unwrap() - 10.0).abs() < 1e-9);
    assert!((value_of(&readings, Metric::Pm10).unwrap() - 20.0).abs() < 1e-9);
}

#[test]
fn test_nova_silent_stream_is_read_failure() {
    let (clock, window) = window_of(1);
    let config = NovaConfig {
        window,
        ..NovaConfig::default()
    };

    let mut driver = NovaDriver::new(scripted(ScriptedReader::new()), config)
        .unwrap()
        .with_clock(clock);
    assert!(matches!(driver.acquire(), Err(SensorError::ReadFailure(_))));
}

#[test]
fn test_nova_read_error_mid_window() {
    let (clock, window) = window_of(5);
    let config = NovaConfig {
        window,
        ..NovaConfig::default()
    };

    let source = ScriptedReader::new()
        .chunk(nova_chunk(1, 1))
        .chunk(nova_chunk(100, 200))
        .fail(ErrorKind::BrokenPipe);

    let mut driver = NovaDriver::new(scripted(source), config)
        .unwrap()
        .with_clock(clock);
    assert!(matches!(driver.acquire(), Err(SensorError::ReadFailure(_))));
}

#[test]
fn test_nova_short_chunks_are_not_counted() {
    let (clock, window) = window_of(3);
    let config = NovaConfig {
        window,
        ..NovaConfig::default()
    };

    let source = ScriptedReader::new()
        .chunk(nova_chunk(0, 0))
        .chunk(nova_chunk(250, 500))
        .chunk(vec![0xaa, 0xc0])
        .chunk(nova_chunk(150, 300));

    let mut driver = NovaDriver::new(scripted(source), config)
        .unwrap()
        .with_clock(clock);
    let readings = driver.acquire().unwrap();

    assert!((value_of(&readings, Metric::Pm25).unwrap() - 20.0).abs() < 1e-9);
    assert!((value_of(&readings, Metric::Pm10).unwrap() - 40.0).abs() < 1e-9);
}

#[test]
fn test_nova_rejects_tiny_chunk_size() {
    let config = NovaConfig {
        chunk_size: 4,
        ..NovaConfig::default()
    };
    let opener = || -> SensorResult<Box<dyn Read>> { unreachable!() };
    assert!(matches!(
        NovaDriver::new(opener, config),
        Err(SensorError::InvalidConfig(_))
    ));
}

#[test]
fn test_drivers_declare_metrics() {
    let opener = || -> SensorResult<Box<dyn Read>> { unreachable!() };
    let sds = NovaDriver::new(opener, NovaConfig::default()).unwrap();
    assert_eq!(sds.metrics(), &[Metric::Pm25, Metric::Pm10]);
    assert_eq!(sds.name(), "sds");

    let opener = || -> SensorResult<Box<dyn Read>> { unreachable!() };
    let pms = PlantowerDriver::new(opener, PlantowerConfig::default()).unwrap();
    assert_eq!(pms.metrics(), &[Metric::Pm1, Metric::Pm25, Metric::Pm10]);
}
