// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pointer release velocity.
//!
//! Each pointer gets one impulse-strategy estimator per axis. The estimate
//! treats consecutive samples as impulses applied to a unit mass and reports
//! the velocity matching the accumulated kinetic energy, which follows a
//! finger's last flick more closely than a least-squares fit.

use hashbrown::HashMap;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::frame::{PointerId, TouchFrame};

const HISTORY_SIZE: usize = 20;
/// Only samples this recent relative to the newest one are considered.
const HORIZON_MS: u64 = 100;
/// A pause longer than this means the pointer stopped.
const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Clone, Copy, Debug, Default)]
struct TimedSample {
    time_ms: u64,
    value: f64,
}

/// One-dimensional impulse velocity estimator.
#[derive(Clone, Debug, Default)]
pub struct AxisVelocity {
    samples: [Option<TimedSample>; HISTORY_SIZE],
    index: usize,
}

impl AxisVelocity {
    /// Creates an estimator with no samples.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an absolute position observed at `time_ms`.
    pub fn add(&mut self, time_ms: u64, value: f64) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(TimedSample { time_ms, value });
    }

    /// Estimated velocity in units per second.
    ///
    /// Fewer than two usable samples yield `0.0`.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        let mut values = [0.0_f64; HISTORY_SIZE];
        let mut times = [0.0_f64; HISTORY_SIZE];
        let mut count = 0;
        let mut index = self.index;
        while let Some(sample) = self.samples[index] {
            // Gaps are measured against the newest sample.
            let age = newest.time_ms.saturating_sub(sample.time_ms);
            if age > HORIZON_MS.min(ASSUME_STOPPED_MS) {
                break;
            }
            values[count] = sample.value;
            times[count] = -(age as f64);
            count += 1;
            if count >= HISTORY_SIZE {
                break;
            }
            index = index.checked_sub(1).unwrap_or(HISTORY_SIZE - 1);
        }
        if count < 2 {
            return 0.0;
        }

        let velocity = impulse_velocity(&values[..count], &times[..count]) * 1000.0;
        if velocity.is_finite() { velocity } else { 0.0 }
    }

    /// Drops every sample.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Velocity per millisecond from samples ordered newest first.
fn impulse_velocity(values: &[f64], times: &[f64]) -> f64 {
    let start = values.len() - 1;
    let mut work = 0.0;
    let mut next_time = times[start];
    for i in (1..=start).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }
        let v_curr = (values[i - 1] - values[i]) / (next_time - current_time);
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == start {
            work *= 0.5;
        }
    }
    kinetic_energy_to_velocity(work)
}

fn kinetic_energy_to_velocity(energy: f64) -> f64 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}

#[derive(Clone, Debug, Default)]
struct PointerAxes {
    x: AxisVelocity,
    y: AxisVelocity,
}

/// Release velocity estimators for every pointer that moved.
#[derive(Clone, Debug, Default)]
pub struct PointerVelocityTracker {
    pointers: HashMap<PointerId, PointerAxes>,
}

impl PointerVelocityTracker {
    /// Creates a tracker with no pointers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sample for `id`, creating its estimators on first use.
    pub fn add(&mut self, id: PointerId, time_ms: u64, position: Point) {
        let axes = self.pointers.entry(id).or_default();
        axes.x.add(time_ms, position.x);
        axes.y.add(time_ms, position.y);
    }

    /// Adds a sample for every pointer of `frame`.
    pub fn add_frame(&mut self, frame: &TouchFrame) {
        for sample in &frame.pointers {
            self.add(sample.id, frame.timestamp, sample.position);
        }
    }

    /// Estimated velocity of `id`, or zero if it has not moved.
    #[must_use]
    pub fn velocity(&self, id: PointerId) -> Vec2 {
        self.pointers.get(&id).map_or(Vec2::ZERO, |axes| {
            Vec2::new(axes.x.velocity(), axes.y.velocity())
        })
    }

    /// Combined speed of the pointers of `frame`, the lifting one included.
    ///
    /// The absolute per-axis velocities are summed, and the length of that sum
    /// is divided by the pointer count.
    #[must_use]
    pub fn release_speed(&self, frame: &TouchFrame) -> f64 {
        if frame.pointers.is_empty() {
            return 0.0;
        }
        let total = frame
            .pointers
            .iter()
            .map(|sample| self.velocity(sample.id))
            .fold(Vec2::ZERO, |acc, v| acc + Vec2::new(v.x.abs(), v.y.abs()));
        total.length() / frame.pointers.len() as f64
    }

    /// Forgets `id`.
    pub fn remove(&mut self, id: PointerId) {
        self.pointers.remove(&id);
    }

    /// Forgets every pointer.
    pub fn clear(&mut self) {
        self.pointers.clear();
    }

    /// Number of pointers being tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Returns `true` if no pointer is being tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }
}
