//! Testes do módulo airlog-core

use super::*;
use crate::testing::ScriptedReader;
use chrono::TimeZone;
use std::io::{Cursor, ErrorKind};

fn plantower_frame(pm1: u16, pm25: u16, pm10: u16) -> Vec<u8> {
    let mut frame = vec![0u8; 32];
    frame[0] = 0x42;
    frame[1] = 0x4d;
    frame[2..4].copy_from_slice(&28u16.to_be_bytes());
    frame[4..6].copy_from_slice(&pm1.to_be_bytes());
    frame[6..8].copy_from_slice(&pm25.to_be_bytes());
    frame[8..10].copy_from_slice(&pm10.to_be_bytes());
    frame
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES DE FRAME READER
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_aligned_frame_decodes_big_endian_fields() {
    for (pm25, pm10) in [(0u16, 0u16), (12, 35), (0x0102, 0xfffe), (999, 1000)] {
        let bytes = plantower_frame(7, pm25, pm10);
        let mut reader = FrameReader::new(Cursor::new(bytes.clone()), 32, 0x42);

        let frame = reader.next_frame().unwrap();
        assert_eq!(frame.as_bytes(), bytes.as_slice());
        assert_eq!(frame.be_u16(6), Some(pm25));
        assert_eq!(frame.be_u16(8), Some(pm10));
    }
}

#[test]
fn test_resync_discards_partial_frame_and_garbage() {
    let valid = plantower_frame(3, 25, 40);
    // Cauda de um frame anterior, lixo, depois um frame completo
    let source = ScriptedReader::new()
        .chunk(vec![0x00, 0x19, 0x00, 0x28, 0x01, 0x9a])
        .chunk(vec![0xff, 0x13, 0x37, 0x00])
        .chunk(valid.clone());

    let mut reader = FrameReader::new(source, 32, 0x42);
    let frame = reader.next_frame().unwrap();

    assert_eq!(frame.as_bytes(), valid.as_slice());
    assert_eq!(reader.discarded(), 10);
}

#[test]
fn test_sentinel_mid_chunk_starts_frame() {
    let valid = plantower_frame(1, 2, 3);
    let mut chunk = vec![0x11, 0x22, 0x33];
    chunk.extend_from_slice(&valid[..10]);

    let source = ScriptedReader::new()
        .chunk(chunk)
        .chunk(valid[10..20].to_vec())
        .chunk(valid[20..].to_vec());

    let mut reader = FrameReader::new(source, 32, 0x42);
    let frame = reader.next_frame().unwrap();
    assert_eq!(frame.as_bytes(), valid.as_slice());
}

#[test]
fn test_frame_accumulates_across_reads_and_truncates() {
    let valid = plantower_frame(5, 6, 7);
    let mut tail = valid[16..].to_vec();
    tail.extend_from_slice(&[0x42, 0x4d, 0x00]); // começo do próximo frame

    let source = ScriptedReader::new().chunk(valid[..16].to_vec()).chunk(tail);

    let mut reader = FrameReader::new(source, 32, 0x42);
    let frame = reader.next_frame().unwrap();
    assert_eq!(frame.len(), 32);
    assert_eq!(frame.as_bytes(), valid.as_slice());
    // Os bytes além de L são descartados junto com o buffer
    assert_eq!(reader.discarded(), 3);
}

#[test]
fn test_consecutive_frames() {
    let first = plantower_frame(1, 1, 1);
    let second = plantower_frame(2, 2, 2);
    let source = ScriptedReader::from_chunks([first.clone(), second.clone()]);

    let mut reader = FrameReader::new(source, 32, 0x42);
    assert_eq!(reader.next_frame().unwrap().as_bytes(), first.as_slice());
    assert_eq!(reader.next_frame().unwrap().as_bytes(), second.as_slice());
}

#[test]
fn test_idle_reads_are_retried() {
    let valid = plantower_frame(4, 5, 6);
    let source = ScriptedReader::new().idle().idle().chunk(valid.clone());

    let mut reader = FrameReader::new(source, 32, 0x42);
    assert_eq!(reader.next_frame().unwrap().as_bytes(), valid.as_slice());
}

#[test]
fn test_source_error_is_read_failure() {
    let valid = plantower_frame(4, 5, 6);
    let source = ScriptedReader::new()
        .chunk(valid[..8].to_vec())
        .fail(ErrorKind::BrokenPipe);

    let mut reader = FrameReader::new(source, 32, 0x42);
    let err = reader.next_frame().unwrap_err();
    assert!(matches!(err, SensorError::ReadFailure(_)));
}

#[test]
fn test_exhausted_source_is_read_failure() {
    let source = ScriptedReader::new().chunk(vec![0x00, 0x01, 0x02]);
    let mut reader = FrameReader::new(source, 32, 0x42).with_max_idle_reads(4);

    let err = reader.next_frame().unwrap_err();
    assert!(matches!(err, SensorError::ReadFailure(ref msg) if msg.contains("no data")));
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES DE READING SET
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_reading_set_holds_one_reading_per_metric() {
    let mut set = ReadingSet::new();
    assert!(set.is_empty());

    set.insert(Reading::new(SensorModel::Sds021, Metric::Pm25, 12.5));
    set.insert(Reading::new(SensorModel::Sds021, Metric::Pm10, 20.0));
    let previous = set.insert(Reading::new(SensorModel::Sds021, Metric::Pm25, 13.0));

    assert_eq!(previous.map(|r| r.value()), Some(12.5));
    assert_eq!(set.len(), 2);
    assert_eq!(set.get(Metric::Pm25).map(|r| r.value()), Some(13.0));
    assert!(!set.contains(Metric::Temperature));
    assert_eq!(set.metrics().collect::<Vec<_>>(), vec![Metric::Pm25, Metric::Pm10]);
}

#[test]
fn test_reading_serializes_with_timestamp() {
    let captured_at = chrono::Utc.with_ymd_and_hms(2017, 3, 4, 12, 0, 0).unwrap();
    let reading = Reading::at(SensorModel::Dht22, Metric::Humidity, 45.5, captured_at);

    let json = serde_json::to_value(reading).unwrap();
    assert_eq!(json["metric"], "humidity");
    assert_eq!(json["sensor"], "dht22");
    assert_eq!(json["value"], 45.5);
    assert_eq!(json["captured_at"], "2017-03-04T12:00:00Z");
}

#[test]
fn test_closure_is_stream_opener() {
    let mut opens = 0;
    let mut opener = || -> SensorResult<Box<dyn std::io::Read>> {
        opens += 1;
        Ok(Box::new(Cursor::new(vec![1, 2, 3])))
    };
    assert!(opener.open().is_ok());
    assert!(opener.open().is_ok());
    drop(opener);
    assert_eq!(opens, 2);
}
