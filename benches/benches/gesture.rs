// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Vec2};
use understory_gesture::{
    DeferredAction, GestureEngine, GestureListener, PointerSample, TouchFrame,
};
use understory_timing::TimerQueue;

/// Listener that only counts callbacks so the work can't be optimized out.
#[derive(Default)]
struct Count(u64);

impl GestureListener for Count {
    fn on_move(&mut self, _delta: Vec2) {
        self.0 += 1;
    }

    fn on_scale(&mut self, _focus: Point, _factor: f64) {
        self.0 += 1;
    }

    fn on_rotate(&mut self, _focus: Point, _angle: f64) {
        self.0 += 1;
    }
}

fn pointers(fingers: u64, k: f64) -> Vec<PointerSample> {
    let center = Point::new(400.0, 300.0) + Vec2::new(0.5 * k, 0.0);
    (0..fingers)
        .map(|id| {
            let angle = 0.05 * k + id as f64 * std::f64::consts::TAU / fingers as f64;
            let at = center + Vec2::from_angle(angle) * (100.0 + 0.1 * k);
            PointerSample::new(id, at.x, at.y)
        })
        .collect()
}

/// Fingers go down one by one, twist for `moves` frames, then lift.
fn stream(fingers: u64, moves: u64) -> Vec<TouchFrame> {
    let mut frames = Vec::new();
    let mut t = 0;
    let first = pointers(fingers, 0.0);
    frames.push(TouchFrame::down(t, first[0]));
    for n in 2..=first.len() {
        t += 8;
        frames.push(TouchFrame::pointer_down(t, first[..n].iter().copied()));
    }
    for k in 1..=moves {
        t += 16;
        frames.push(TouchFrame::moved(t, pointers(fingers, k as f64)));
    }
    let mut last = pointers(fingers, moves as f64);
    while last.len() > 1 {
        t += 4;
        let lifting = last.len() - 1;
        frames.push(TouchFrame::pointer_up(t, last.iter().copied(), lifting));
        last.pop();
    }
    frames.push(TouchFrame::up(t + 4, last[0]));
    frames
}

fn bench_process_event(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/process_event");

    for fingers in [1_u64, 2, 5] {
        let frames = stream(fingers, 256);
        group.throughput(Throughput::Elements(frames.len() as u64));

        group.bench_with_input(BenchmarkId::new("twist", fingers), &frames, |b, frames| {
            b.iter_batched(
                || {
                    (
                        GestureEngine::default(),
                        Count::default(),
                        TimerQueue::<DeferredAction>::new(),
                    )
                },
                |(mut engine, mut count, mut timers)| {
                    for frame in frames {
                        engine
                            .process_event(frame, &mut count, &mut timers)
                            .unwrap();
                    }
                    black_box((engine, count.0));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_fling_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/fling_ticks");

    // The fling's length is proportional to how fast the pan was.
    for speed in [500.0_f64, 2_000.0, 8_000.0] {
        let step = speed * 0.01;
        let mut frames = vec![TouchFrame::down(0, PointerSample::new(0, 0.0, 0.0))];
        for i in 1..=10_u64 {
            frames.push(TouchFrame::moved(
                i * 10,
                [PointerSample::new(0, step * i as f64, 0.0)],
            ));
        }
        frames.push(TouchFrame::up(105, PointerSample::new(0, step * 10.0, 0.0)));

        group.bench_with_input(
            BenchmarkId::new("pan_release", speed as u64),
            &frames,
            |b, frames| {
                b.iter_batched(
                    || {
                        let mut engine = GestureEngine::default();
                        let mut count = Count::default();
                        let mut timers = TimerQueue::<DeferredAction>::new();
                        for frame in frames {
                            engine
                                .process_event(frame, &mut count, &mut timers)
                                .unwrap();
                        }
                        (engine, count)
                    },
                    |(mut engine, mut count)| {
                        let mut now = 121;
                        while engine.tick(now, &mut count) {
                            now += 16;
                        }
                        black_box(count.0);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_process_event, bench_fling_ticks);
criterion_main!(benches);
