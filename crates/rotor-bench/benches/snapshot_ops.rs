//! Criterion benchmarks for snapshot publication and reads.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rotor_bench::{fast_worker_config, reference_profile};
use rotor_core::{GimbalState, KinematicsSnapshot, StepId};
use rotor_engine::{FlightWorker, SnapshotRing};

fn sample_snapshot(step: u64) -> KinematicsSnapshot {
    let profile = reference_profile().unwrap();
    let state = rotor_core::Dynamics::reset(&profile.model, &profile.start);
    KinematicsSnapshot::capture(
        StepId(step),
        step as f64 * 0.001,
        &state,
        GimbalState::default(),
        1.0,
    )
}

fn bench_ring_publish(c: &mut Criterion) {
    let ring = SnapshotRing::new(8, sample_snapshot(0));
    let snap = sample_snapshot(1);

    c.bench_function("ring_publish", |b| {
        b.iter(|| {
            ring.publish(black_box(snap.clone()));
        });
    });
}

fn bench_ring_latest(c: &mut Criterion) {
    let ring = SnapshotRing::new(8, sample_snapshot(0));
    for k in 1..8 {
        ring.publish(sample_snapshot(k));
    }

    c.bench_function("ring_latest", |b| {
        b.iter(|| {
            black_box(ring.latest());
        });
    });
}

fn bench_worker_kinematics(c: &mut Criterion) {
    let profile = reference_profile().unwrap();
    let mut worker =
        FlightWorker::create(profile.model, profile.start, fast_worker_config()).unwrap();
    worker.submit(profile.command).unwrap();

    // Reads contend with a live producer.
    c.bench_function("worker_kinematics", |b| {
        b.iter(|| {
            black_box(worker.kinematics());
        });
    });

    worker.stop().unwrap();
}

criterion_group!(
    benches,
    bench_ring_publish,
    bench_ring_latest,
    bench_worker_kinematics
);
criterion_main!(benches);
