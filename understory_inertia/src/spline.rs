// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spline-based fling deceleration, in the shape of the classic Android
//! scroller physics.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

const INFLECTION: f64 = 0.35;
const START_TENSION: f64 = 0.5;
const END_TENSION: f64 = 1.0;
const P1: f64 = START_TENSION * INFLECTION;
const P2: f64 = 1.0 - END_TENSION * (1.0 - INFLECTION);

/// Number of segments in the spline lookup table.
const NB_SAMPLES: usize = 100;

/// Earth's gravity in SI units (m/s²).
const GRAVITY_EARTH: f64 = 9.80665;
const INCHES_PER_METER: f64 = 39.37;
/// Baseline pixels per inch at density `1.0`.
const BASELINE_PPI: f64 = 160.0;
/// `|ln(0.78) / ln(0.9)|`
const DECELERATION_RATE: f64 = 2.358_201_6;

/// Sample of the normalized fling spline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplineSample {
    /// Fraction of the total distance covered, in `0.0..=1.0`.
    pub distance: f64,
    /// Slope of the distance curve at the sample point.
    pub velocity: f64,
}

/// Precomputed lookup table for the normalized fling spline.
///
/// The table maps normalized time (`0.0..=1.0`) to the fraction of the total
/// fling distance covered. The curve is monotonic and concave, so equal time
/// steps yield non-increasing distance steps.
#[derive(Clone, Debug)]
pub struct SplineTable {
    positions: [f64; NB_SAMPLES + 1],
}

impl Default for SplineTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SplineTable {
    /// Builds the lookup table.
    #[must_use]
    pub fn new() -> Self {
        let mut positions = [0.0; NB_SAMPLES + 1];
        let mut x_min = 0.0_f64;

        for (i, slot) in positions.iter_mut().take(NB_SAMPLES).enumerate() {
            let alpha = i as f64 / NB_SAMPLES as f64;

            // Bisect for the bezier parameter whose time component is `alpha`.
            let mut x_max = 1.0_f64;
            let (x, coef) = loop {
                let x_mid = x_min + (x_max - x_min) / 2.0;
                let c = 3.0 * x_mid * (1.0 - x_mid);
                let tx = c * ((1.0 - x_mid) * P1 + x_mid * P2) + x_mid * x_mid * x_mid;
                if (tx - alpha).abs() < 1e-5 {
                    break (x_mid, c);
                }
                if tx > alpha {
                    x_max = x_mid;
                } else {
                    x_min = x_mid;
                }
            };
            *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
        }
        positions[NB_SAMPLES] = 1.0;

        Self { positions }
    }

    /// Samples the spline at normalized time `t`, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn sample(&self, t: f64) -> SplineSample {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        #[expect(
            clippy::cast_possible_truncation,
            reason = "t is clamped to 0..=1, so the index is at most NB_SAMPLES"
        )]
        let index = (NB_SAMPLES as f64 * t) as usize;
        if index >= NB_SAMPLES {
            return SplineSample {
                distance: 1.0,
                velocity: 0.0,
            };
        }

        let t_inf = index as f64 / NB_SAMPLES as f64;
        let t_sup = (index + 1) as f64 / NB_SAMPLES as f64;
        let d_inf = self.positions[index];
        let d_sup = self.positions[index + 1];
        let velocity = (d_sup - d_inf) / (t_sup - t_inf);
        SplineSample {
            distance: d_inf + (t - t_inf) * velocity,
            velocity,
        }
    }
}

/// Duration and distance of a fling launched at a given speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingInfo {
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// Total (unsigned) distance travelled.
    pub distance: f64,
}

/// Friction model turning a launch speed into a fling duration and distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingCurve {
    friction: f64,
    physical_coefficient: f64,
}

impl Default for FlingCurve {
    fn default() -> Self {
        Self::with_density(1.0)
    }
}

impl FlingCurve {
    /// Default scroll friction.
    pub const DEFAULT_FRICTION: f64 = 0.015;

    /// Creates a curve for the given friction and display density.
    ///
    /// `density` is the ratio of device pixels to density-independent pixels
    /// (`1.0` at 160 ppi).
    #[must_use]
    pub fn new(friction: f64, density: f64) -> Self {
        Self {
            friction,
            physical_coefficient: GRAVITY_EARTH * INCHES_PER_METER * BASELINE_PPI * density * 0.84,
        }
    }

    /// Creates a curve with [`Self::DEFAULT_FRICTION`].
    #[must_use]
    pub fn with_density(density: f64) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    /// Returns the friction coefficient.
    #[must_use]
    pub fn friction(&self) -> f64 {
        self.friction
    }

    fn spline_deceleration(&self, speed: f64) -> Option<f64> {
        if !speed.is_finite() || speed == 0.0 {
            return None;
        }
        let l = (INFLECTION * speed.abs() / (self.friction * self.physical_coefficient)).ln();
        l.is_finite().then_some(l)
    }

    /// Fling duration in milliseconds for a launch speed in units per second.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float-to-int casts saturate; sub-millisecond precision is not needed"
    )]
    pub fn duration_ms(&self, speed: f64) -> u64 {
        let Some(l) = self.spline_deceleration(speed) else {
            return 0;
        };
        (1000.0 * (l / (DECELERATION_RATE - 1.0)).exp()) as u64
    }

    /// Total unsigned distance travelled for a launch speed in units per second.
    #[must_use]
    pub fn distance(&self, speed: f64) -> f64 {
        let Some(l) = self.spline_deceleration(speed) else {
            return 0.0;
        };
        self.friction
            * self.physical_coefficient
            * (DECELERATION_RATE / (DECELERATION_RATE - 1.0) * l).exp()
    }

    /// Duration and distance for a launch speed.
    #[must_use]
    pub fn info(&self, speed: f64) -> FlingInfo {
        FlingInfo {
            duration_ms: self.duration_ms(speed),
            distance: self.distance(speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FlingCurve, SplineTable};

    #[test]
    fn spline_endpoints() {
        let table = SplineTable::new();
        assert!(table.sample(0.0).distance.abs() < 0.01);
        assert!((table.sample(1.0).distance - 1.0).abs() < 1e-12);
        assert_eq!(table.sample(1.0).velocity, 0.0);
    }

    #[test]
    fn spline_is_monotonic_and_concave() {
        let table = SplineTable::new();
        let mut prev_distance = 0.0;
        let mut prev_velocity = f64::INFINITY;
        for i in 0..100 {
            let s = table.sample(f64::from(i) / 100.0);
            assert!(s.distance >= prev_distance, "distance must not go backwards");
            assert!(
                s.velocity <= prev_velocity + 1e-9,
                "slope must not increase at step {i}"
            );
            prev_distance = s.distance;
            prev_velocity = s.velocity;
        }
    }

    #[test]
    fn out_of_range_times_are_clamped() {
        let table = SplineTable::new();
        assert_eq!(table.sample(-3.0), table.sample(0.0));
        assert_eq!(table.sample(7.0).distance, 1.0);
        assert_eq!(table.sample(f64::NAN).distance, 1.0);
    }

    #[test]
    fn faster_flings_last_longer_and_travel_further() {
        let curve = FlingCurve::with_density(2.0);
        let slow = curve.info(5_000.0);
        let fast = curve.info(10_000.0);
        assert!(slow.duration_ms > 0, "duration should be positive");
        assert!(slow.distance > 0.0, "distance should be positive");
        assert!(fast.duration_ms > slow.duration_ms);
        assert!(fast.distance > slow.distance);
    }

    #[test]
    fn direction_does_not_change_magnitude() {
        let curve = FlingCurve::default();
        assert_eq!(curve.info(-1_200.0), curve.info(1_200.0));
    }

    #[test]
    fn degenerate_speeds_do_not_move() {
        let curve = FlingCurve::default();
        for speed in [0.0, f64::NAN, f64::INFINITY] {
            let info = curve.info(speed);
            assert_eq!(info.duration_ms, 0);
            assert_eq!(info.distance, 0.0);
        }
    }
}
