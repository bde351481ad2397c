// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

use crate::spline::{FlingCurve, SplineTable};

/// Two-axis decelerating fling simulator.
///
/// A fling is launched with [`Fling::start`] and then polled with
/// [`Fling::compute`] using the host's monotonic clock. Both axes share one
/// duration derived from the combined speed; the travelled distance is split
/// along the launch direction, so the path is a straight line.
///
/// Callers that only need one dimension use the `x` axis and ignore `y`.
#[derive(Clone, Debug)]
pub struct Fling {
    curve: FlingCurve,
    spline: SplineTable,
    start: Point,
    end: Point,
    current: Point,
    start_time: u64,
    duration_ms: u64,
    finished: bool,
}

impl Default for Fling {
    fn default() -> Self {
        Self::new(FlingCurve::default())
    }
}

impl Fling {
    /// Creates an idle simulator using `curve` for deceleration.
    #[must_use]
    pub fn new(curve: FlingCurve) -> Self {
        Self {
            curve,
            spline: SplineTable::new(),
            start: Point::ZERO,
            end: Point::ZERO,
            current: Point::ZERO,
            start_time: 0,
            duration_ms: 0,
            finished: true,
        }
    }

    /// Returns the deceleration curve.
    #[must_use]
    pub fn curve(&self) -> FlingCurve {
        self.curve
    }

    /// Launches a fling from `start` with `velocity` (units per second) at `now`.
    ///
    /// A zero or non-finite velocity produces a fling that settles on the
    /// first [`Fling::compute`].
    pub fn start(&mut self, start: Point, velocity: Vec2, now: u64) {
        let speed = velocity.length();
        let direction = if speed > 0.0 && speed.is_finite() {
            velocity / speed
        } else {
            Vec2::ZERO
        };
        let info = self.curve.info(speed);

        self.start = start;
        self.end = start + direction * info.distance;
        self.current = start;
        self.start_time = now;
        self.duration_ms = info.duration_ms;
        self.finished = false;
    }

    /// Advances the simulation to `now`.
    ///
    /// Returns `false` once the fling has finished. The call that reaches the
    /// end of the fling moves to the final position and still returns `true`.
    pub fn compute(&mut self, now: u64) -> bool {
        if self.finished {
            return false;
        }
        let elapsed = now.saturating_sub(self.start_time);
        if elapsed < self.duration_ms {
            let t = elapsed as f64 / self.duration_ms as f64;
            let coef = self.spline.sample(t).distance;
            self.current = self.start.lerp(self.end, coef);
        } else {
            self.current = self.end;
            self.finished = true;
        }
        true
    }

    /// Stops the fling where it is.
    pub fn force_finish(&mut self) {
        self.finished = true;
    }

    /// Returns `true` when no fling is in progress.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Position reached by the last [`Fling::compute`].
    #[must_use]
    pub fn current(&self) -> Point {
        self.current
    }

    /// Position the fling settles at.
    #[must_use]
    pub fn final_position(&self) -> Point {
        self.end
    }

    /// Duration of the current fling in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::{Point, Vec2};

    use super::Fling;

    fn run(fling: &mut Fling, mut now: u64, step: u64) -> Vec<Point> {
        let mut positions = Vec::new();
        while fling.compute(now) {
            positions.push(fling.current());
            now += step;
        }
        positions
    }

    #[test]
    fn idle_fling_does_not_compute() {
        let mut fling = Fling::default();
        assert!(fling.is_finished());
        assert!(!fling.compute(0));
    }

    #[test]
    fn settles_on_final_position_then_reports_done() {
        let mut fling = Fling::default();
        fling.start(Point::new(10.0, 20.0), Vec2::new(1_500.0, 0.0), 1_000);
        assert!(fling.duration_ms() > 0);

        let positions = run(&mut fling, 1_000, 16);
        let last = positions.last().copied().unwrap();
        assert_eq!(last, fling.final_position());
        assert!(last.x > 10.0);
        assert_eq!(last.y, 20.0);
        assert!(!fling.compute(1_000_000), "finished flings stay finished");
    }

    #[test]
    fn steps_shrink_over_time() {
        let mut fling = Fling::default();
        fling.start(Point::ZERO, Vec2::new(-2_000.0, 800.0), 0);
        let positions = run(&mut fling, 0, 16);
        assert!(positions.len() > 3);

        let mut prev = f64::INFINITY;
        for pair in positions.windows(2) {
            let step = (pair[1] - pair[0]).length();
            assert!(step <= prev + 1e-9, "step {step} grew past {prev}");
            prev = step;
        }
        let end = fling.final_position();
        assert!(end.x < 0.0 && end.y > 0.0, "fling follows launch direction");
    }

    #[test]
    fn zero_velocity_settles_immediately() {
        let mut fling = Fling::default();
        fling.start(Point::new(3.0, 4.0), Vec2::ZERO, 50);
        assert!(fling.compute(50));
        assert_eq!(fling.current(), Point::new(3.0, 4.0));
        assert!(!fling.compute(66));
    }

    #[test]
    fn force_finish_stops_immediately() {
        let mut fling = Fling::default();
        fling.start(Point::ZERO, Vec2::new(4_000.0, 0.0), 0);
        assert!(fling.compute(16));
        fling.force_finish();
        assert!(fling.is_finished());
        assert!(!fling.compute(32));
    }
}
