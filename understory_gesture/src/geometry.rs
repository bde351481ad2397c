// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer geometry: focus, span and frame-to-frame rotation.
//!
//! All functions skip the lifting pointer of up frames, so the values
//! describe the contacts that remain on the surface.

use hashbrown::HashMap;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::frame::{PointerId, TouchFrame};

/// Vectors shorter than this are too short to carry a direction.
const MIN_DIRECTION_LENGTH: f64 = 1e-9;

/// Centroid of the active pointers, or `None` if no pointer stays active.
#[must_use]
pub fn compute_focus(frame: &TouchFrame) -> Option<Point> {
    let mut sum = Vec2::ZERO;
    let mut count = 0_usize;
    for sample in frame.active() {
        sum += sample.position.to_vec2();
        count += 1;
    }
    (count > 0).then(|| (sum / count as f64).to_point())
}

/// Average spread of the active pointers around `focus`.
///
/// The per-axis absolute offsets are summed first and the length of that sum
/// vector is divided by the pointer count. Returns `None` for fewer than two
/// active pointers.
#[must_use]
pub fn compute_span(frame: &TouchFrame, focus: Point) -> Option<f64> {
    let mut spread = Vec2::ZERO;
    let mut count = 0_usize;
    for sample in frame.active() {
        let offset = focus - sample.position;
        spread += Vec2::new(offset.x.abs(), offset.y.abs());
        count += 1;
    }
    (count >= 2).then(|| spread.length() / count as f64)
}

/// Last known position of each pointer, used to measure rotation between frames.
#[derive(Clone, Debug, Default)]
pub struct PointerHistory {
    positions: HashMap<PointerId, Point>,
}

impl PointerHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last recorded position of `id`, if it has one.
    #[must_use]
    pub fn get(&self, id: PointerId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Records `position` as the latest position of `id`.
    pub fn record(&mut self, id: PointerId, position: Point) {
        self.positions.insert(id, position);
    }

    /// Records the position of every pointer in `frame`, lifting ones included.
    pub fn record_frame(&mut self, frame: &TouchFrame) {
        for sample in &frame.pointers {
            self.record(sample.id, sample.position);
        }
    }

    /// Forgets `id`, typically once its contact is released.
    pub fn remove(&mut self, id: PointerId) {
        self.positions.remove(&id);
    }

    /// Forgets every pointer.
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Number of pointers with a recorded position.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no pointer has a recorded position.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn direction(v: Vec2) -> Option<Vec2> {
    let length = v.length();
    (length.is_finite() && length > MIN_DIRECTION_LENGTH).then(|| v / length)
}

/// Mean signed angle (radians) the active pointers turned about the focus
/// since the previous frame.
///
/// For each pointer, the direction from `last_focus` to its recorded position
/// is compared with the direction from `focus` to its current position; the
/// angle is `-asin(cross(current, previous))`, which is accurate for the small
/// per-frame angles touch sampling produces. Pointers without a recorded
/// position, or too close to the focus to have a direction, are skipped. Yields
/// `0.0` if no pointer contributes.
///
/// Afterwards `history` holds the current position of every pointer in the
/// frame.
pub fn compute_rotation_delta(
    frame: &TouchFrame,
    focus: Point,
    last_focus: Point,
    history: &mut PointerHistory,
) -> f64 {
    let mut angle = 0.0;
    let mut count = 0_usize;
    for sample in frame.active() {
        let Some(previous) = history.get(sample.id) else {
            continue;
        };
        let (Some(a), Some(b)) = (
            direction(sample.position - focus),
            direction(previous - last_focus),
        ) else {
            continue;
        };
        angle -= a.cross(b).clamp(-1.0, 1.0).asin();
        count += 1;
    }
    history.record_frame(frame);

    if count == 0 {
        0.0
    } else {
        angle / count as f64
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::{Point, Vec2};

    use super::{PointerHistory, compute_focus, compute_rotation_delta, compute_span};
    use crate::frame::{PointerSample, TouchFrame};

    /// Small deterministic generator so the property checks are reproducible.
    struct Lcg(u64);

    impl Lcg {
        fn next_f64(&mut self) -> f64 {
            self.0 = self
                .0
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (self.0 >> 11) as f64 / (1_u64 << 53) as f64
        }

        fn coord(&mut self) -> f64 {
            self.next_f64() * 2_000.0 - 1_000.0
        }
    }

    fn samples(points: &[Point]) -> Vec<PointerSample> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| PointerSample::new(i as u64, p.x, p.y))
            .collect()
    }

    fn rotate_about(p: Point, center: Point, theta: f64) -> Point {
        let (s, c) = theta.sin_cos();
        let d = p - center;
        center + Vec2::new(d.x * c - d.y * s, d.x * s + d.y * c)
    }

    #[test]
    fn focus_is_the_mean_of_active_pointers() {
        let mut rng = Lcg(7);
        for n in 1..=6 {
            for _ in 0..50 {
                let points: Vec<Point> = (0..n).map(|_| Point::new(rng.coord(), rng.coord())).collect();
                let focus = compute_focus(&TouchFrame::moved(0, samples(&points))).unwrap();
                let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n as f64;
                let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n as f64;
                assert!((focus.x - mean_x).abs() < 1e-9);
                assert!((focus.y - mean_y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn focus_skips_the_lifting_pointer() {
        let frame = TouchFrame::pointer_up(
            0,
            samples(&[Point::new(0.0, 0.0), Point::new(100.0, 100.0), Point::new(10.0, 0.0)]),
            1,
        );
        assert_eq!(compute_focus(&frame), Some(Point::new(5.0, 0.0)));
    }

    #[test]
    fn focus_of_last_up_is_undefined() {
        let frame = TouchFrame::up(0, PointerSample::new(0, 4.0, 4.0));
        assert_eq!(compute_focus(&frame), None);
    }

    #[test]
    fn span_needs_two_pointers() {
        let one = TouchFrame::moved(0, [PointerSample::new(0, 4.0, 4.0)]);
        assert_eq!(compute_span(&one, Point::new(4.0, 4.0)), None);

        let two = TouchFrame::moved(
            0,
            [PointerSample::new(0, -30.0, 0.0), PointerSample::new(1, 30.0, 0.0)],
        );
        assert_eq!(compute_span(&two, Point::ZERO), Some(30.0));
    }

    #[test]
    fn span_is_non_negative_and_scales_linearly() {
        let mut rng = Lcg(99);
        for n in 2..=5 {
            for _ in 0..50 {
                let points: Vec<Point> = (0..n).map(|_| Point::new(rng.coord(), rng.coord())).collect();
                let frame = TouchFrame::moved(0, samples(&points));
                let focus = compute_focus(&frame).unwrap();
                let span = compute_span(&frame, focus).unwrap();
                assert!(span >= 0.0);

                let k = 0.25 + rng.next_f64() * 3.0;
                let scaled: Vec<Point> = points.iter().map(|p| focus + (*p - focus) * k).collect();
                let frame = TouchFrame::moved(0, samples(&scaled));
                let scaled_focus = compute_focus(&frame).unwrap();
                let scaled_span = compute_span(&frame, scaled_focus).unwrap();
                assert!(
                    (scaled_span - span * k).abs() < 1e-6 * span.max(1.0),
                    "span {span} scaled by {k} gave {scaled_span}"
                );
            }
        }
    }

    #[test]
    fn rigid_rotation_is_measured_and_round_trips() {
        let mut rng = Lcg(3);
        for n in 2..=4 {
            for _ in 0..25 {
                let points: Vec<Point> = (0..n).map(|_| Point::new(rng.coord(), rng.coord())).collect();
                let start = TouchFrame::moved(0, samples(&points));
                let focus = compute_focus(&start).unwrap();
                let mut history = PointerHistory::new();
                history.record_frame(&start);

                let theta = (rng.next_f64() - 0.5) * 0.2;
                let turned: Vec<Point> = points.iter().map(|p| rotate_about(*p, focus, theta)).collect();
                let turned = TouchFrame::moved(16, samples(&turned));
                let forward = compute_rotation_delta(&turned, focus, focus, &mut history);
                assert!((forward - theta).abs() < 1e-6, "measured {forward}, expected {theta}");

                let back = compute_rotation_delta(&start, focus, focus, &mut history);
                assert!((forward + back).abs() < 1e-6, "round trip left {}", forward + back);
            }
        }
    }

    #[test]
    fn rotation_ignores_unrecorded_and_degenerate_pointers() {
        let mut history = PointerHistory::new();
        // Pointer 0 sits exactly on the focus, pointer 1 was never recorded.
        history.record(0, Point::ZERO);
        let frame = TouchFrame::moved(
            0,
            [PointerSample::new(0, 0.0, 0.0), PointerSample::new(1, 5.0, 5.0)],
        );
        let angle = compute_rotation_delta(&frame, Point::ZERO, Point::ZERO, &mut history);
        assert_eq!(angle, 0.0);
        assert!(angle.is_finite());
        assert_eq!(history.get(1), Some(Point::new(5.0, 5.0)), "history is refreshed");
    }

    #[test]
    fn history_forgets_released_pointers() {
        let mut history = PointerHistory::new();
        history.record_frame(&TouchFrame::moved(
            0,
            [PointerSample::new(3, 1.0, 1.0), PointerSample::new(4, 2.0, 2.0)],
        ));
        assert_eq!(history.len(), 2);
        history.remove(3);
        assert_eq!(history.get(3), None);
        history.clear();
        assert!(history.is_empty());
    }
}
