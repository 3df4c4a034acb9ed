//! # Coordinator Benchmarks
//!
//! Measures the fixed cost of one sampling cycle (thread fan-out, channel
//! fan-in, reading set assembly) with drivers that return immediately.
//!
//! Run: `cargo bench --bench coordinator_bench`

use airlog_orchestration::*;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

struct InstantDriver {
    name: &'static str,
    sensor: SensorModel,
    metrics: &'static [Metric],
}

impl Driver for InstantDriver {
    fn name(&self) -> &str {
        self.name
    }

    fn sensor(&self) -> SensorModel {
        self.sensor
    }

    fn metrics(&self) -> &[Metric] {
        self.metrics
    }

    fn acquire(&mut self) -> SensorResult<Vec<Reading>> {
        Ok(self
            .metrics
            .iter()
            .map(|&metric| Reading::new(self.sensor, metric, 1.0))
            .collect())
    }
}

fn deployment() -> Vec<Box<dyn Driver>> {
    vec![
        Box::new(InstantDriver {
            name: "plantower",
            sensor: SensorModel::Pms5003,
            metrics: &[Metric::Pm1, Metric::Pm25, Metric::Pm10],
        }),
        Box::new(InstantDriver {
            name: "dht",
            sensor: SensorModel::Dht22,
            metrics: &[Metric::Temperature, Metric::Humidity],
        }),
        Box::new(InstantDriver {
            name: "microphone",
            sensor: SensorModel::Microphone,
            metrics: &[Metric::SoundLevel],
        }),
    ]
}

fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("coordinator");

    let mut coordinator = match SamplingCoordinator::new(deployment()) {
        Ok(coordinator) => coordinator,
        Err(e) => panic!("invalid deployment: {}", e),
    };

    group.bench_function("run_cycle_3_drivers", |b| {
        b.iter(|| black_box(coordinator.run_cycle().ok()))
    });

    group.finish();
}

criterion_group!(benches, bench_cycle);
criterion_main!(benches);
