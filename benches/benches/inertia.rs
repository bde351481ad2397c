// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Vec2};
use understory_inertia::{Fling, FlingCurve, SplineTable};
use understory_timing::TimerQueue;

fn bench_spline(c: &mut Criterion) {
    let mut group = c.benchmark_group("inertia/spline");

    group.bench_function("table_new", |b| b.iter(|| black_box(SplineTable::new())));

    let table = SplineTable::new();
    let samples: Vec<f64> = (0..1_000).map(|i| f64::from(i) / 1_000.0).collect();
    group.throughput(Throughput::Elements(samples.len() as u64));
    group.bench_function("sample", |b| {
        b.iter(|| {
            for t in &samples {
                black_box(table.sample(black_box(*t)));
            }
        });
    });

    group.finish();
}

fn bench_fling(c: &mut Criterion) {
    let mut group = c.benchmark_group("inertia/fling");
    let curve = FlingCurve::with_density(2.0);

    group.bench_function("info", |b| {
        b.iter(|| black_box(curve.info(black_box(4_000.0))));
    });

    for speed in [500.0_f64, 4_000.0, 16_000.0] {
        group.bench_with_input(
            BenchmarkId::new("run_to_rest", speed as u64),
            &speed,
            |b, &speed| {
                b.iter(|| {
                    let mut fling = Fling::new(curve);
                    fling.start(Point::ZERO, Vec2::new(speed, speed * 0.5), 0);
                    let mut now = 0;
                    while fling.compute(now) {
                        now += 16;
                    }
                    black_box(fling.current())
                });
            },
        );
    }

    group.finish();
}

fn bench_timer_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("timing/timer_queue");

    for len in [16_u64, 256, 4_096] {
        group.throughput(Throughput::Elements(len));
        group.bench_with_input(
            BenchmarkId::new("schedule_drain", len),
            &len,
            |b, &len| {
                b.iter(|| {
                    let mut queue = TimerQueue::new();
                    // Interleaved deadlines so the heap has real work to do.
                    for i in 0..len {
                        queue.schedule((i * 7_919) % len, i);
                    }
                    black_box(queue.drain_due(len).sum::<u64>())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_spline, bench_fling, bench_timer_queue);
criterion_main!(benches);
