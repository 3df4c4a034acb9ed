//! # Acoustic Benchmarks
//!
//! Measures the per-sample decibel reduction and S16LE decoding for one
//! capture block.
//!
//! Run: `cargo bench --bench acoustic_bench`

use std::io::Cursor;

use airlog_acoustic::{DecibelAccumulator, PcmReader, SampleSource};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// Senoide grosseira de amplitude 12000
fn block(len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| ((i as f64 * 0.05).sin() * 12000.0) as i16)
        .collect()
}

fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("decibel_accumulator");

    for len in [1024usize, 8000] {
        let samples = block(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("push_block", len), &samples, |b, samples| {
            b.iter(|| {
                let mut acc = DecibelAccumulator::default();
                acc.push_block(black_box(samples));
                black_box(acc.mean(20.0))
            })
        });
    }

    group.finish();
}

fn bench_pcm_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("pcm_reader");

    let bytes: Vec<u8> = block(8000).iter().flat_map(|s| s.to_le_bytes()).collect();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("decode_8000", |b| {
        let mut buf = vec![0i16; 8000];
        b.iter(|| {
            let mut reader = PcmReader::new(Cursor::new(bytes.as_slice()));
            black_box(reader.read_samples(&mut buf).ok())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_accumulate, bench_pcm_decode);
criterion_main!(benches);
