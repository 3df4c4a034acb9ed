//! # Frame Benchmarks
//!
//! Measures sentinel synchronization and field decoding for particulate
//! sensor streams.
//!
//! Run: `cargo bench --bench frame_bench`

use std::io::Cursor;

use airlog_core::FrameReader;
use airlog_particulate::{NovaSample, PlantowerSample};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// Frame Plantower válido com PM1/PM2.5/PM10 variando
fn plantower_frame(seed: u16) -> Vec<u8> {
    let mut frame = vec![0u8; 32];
    frame[0] = 0x42;
    frame[1] = 0x4d;
    frame[4..6].copy_from_slice(&seed.to_be_bytes());
    frame[6..8].copy_from_slice(&(seed + 1).to_be_bytes());
    frame[8..10].copy_from_slice(&(seed + 2).to_be_bytes());
    frame
}

/// Stream de `frames` frames, cada um precedido de `garbage` bytes de lixo
fn stream(frames: usize, garbage: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(frames * (32 + garbage));
    for i in 0..frames {
        bytes.extend(std::iter::repeat_n(0x11, garbage));
        bytes.extend(plantower_frame(i as u16));
    }
    bytes
}

fn bench_frame_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_sync");

    for garbage in [0usize, 16, 96] {
        let bytes = stream(64, garbage);
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("64_frames", garbage), &bytes, |b, bytes| {
            b.iter(|| {
                // Um frame por leitura: o excedente do chunk é descartado
                let mut reader =
                    FrameReader::with_chunk_size(Cursor::new(bytes.as_slice()), 32, 0x42, 32 + garbage);
                let mut sum = 0u32;
                while let Ok(frame) = reader.next_frame() {
                    if let Ok(sample) = PlantowerSample::from_frame(&frame) {
                        sum += sample.pm25 as u32;
                    }
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let frame = airlog_core::Frame::new(plantower_frame(120));
    group.bench_function("plantower_fields", |b| {
        b.iter(|| black_box(PlantowerSample::from_frame(black_box(&frame))))
    });

    let chunk = [0xaa, 0xc0, 0x7d, 0x00, 0xe8, 0x03, 0x00, 0x00, 0x00, 0xab];
    group.bench_function("nova_chunk", |b| {
        b.iter(|| black_box(NovaSample::from_chunk(black_box(&chunk))))
    });

    group.finish();
}

criterion_group!(benches, bench_frame_sync, bench_decode);
criterion_main!(benches);
