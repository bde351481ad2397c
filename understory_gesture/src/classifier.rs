// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbitration between rotation, scale and translation.
//!
//! While two or more pointers move, the classifier decides once per window
//! whether the motion is a rotation. The decision latches until every pointer
//! is released, so a twist that briefly slows down does not flip back to a
//! pinch. At the first release after movement it captures which of the three
//! continuous gestures dominated, which later decides what kind of fling
//! continues the gesture.

use kurbo::{Point, Vec2};

use crate::velocity::{GestureVelocities, VELOCITY_WINDOW, VelocityChannel};

/// Fling continuation captured at release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlingPlan {
    /// Continue a rotation about `anchor`.
    Rotate {
        /// Arc velocity in units per second.
        velocity: f64,
        /// Focus at release; rotation callbacks pivot around it.
        anchor: Point,
        /// Span at release, the radius converting arc length to angle.
        start_span: f64,
    },
    /// Continue a pinch about `anchor`.
    Scale {
        /// Release speed of the pointers in units per second.
        speed: f64,
        /// Whether the span was growing.
        zoom_in: bool,
        /// Focus at release; scale callbacks pivot around it.
        anchor: Point,
        /// Span at release, where the simulated span starts.
        start_span: f64,
    },
    /// Continue a pan.
    Move {
        /// Release velocity in units per second.
        velocity: Vec2,
    },
}

/// A captured release, waiting for the last pointer to lift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Release {
    /// The fling to start, if the dominant gesture can continue.
    pub plan: Option<FlingPlan>,
    /// Time of the frame that captured the release.
    pub timestamp: u64,
}

/// Rotation latch and release capture.
#[derive(Clone, Debug, Default)]
pub struct GestureClassifier {
    rotating: bool,
    probe_count: usize,
    release: Option<Release>,
}

impl GestureClassifier {
    /// Creates a classifier that has not latched anything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether rotation is latched.
    #[must_use]
    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    /// Multi-pointer move frames seen since the last probe restart.
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.probe_count
    }

    /// Restarts the probe window. Every down and up frame does this.
    pub fn reset_probe(&mut self) {
        self.probe_count = 0;
    }

    /// Counts one multi-pointer move frame and decides the latch once a full
    /// window has been seen.
    ///
    /// A window where any of the move, scale or rotation sums is exactly zero
    /// is inconclusive and restarts the probe. Otherwise rotation latches if
    /// its magnitude beats the scale magnitude. Returns whether rotation is
    /// latched afterwards.
    pub fn probe(&mut self, velocities: &GestureVelocities) -> bool {
        self.probe_count += 1;
        if self.rotating || self.probe_count != VELOCITY_WINDOW {
            return self.rotating;
        }

        let movement = velocities.move_sum().length();
        let scale = velocities.sum(VelocityChannel::Scale).abs();
        let rotation = velocities.sum(VelocityChannel::Rotation).abs();
        if movement == 0.0 || scale == 0.0 || rotation == 0.0 {
            log::trace!("inconclusive rotation probe, restarting");
            self.probe_count = 0;
        } else if rotation > scale {
            log::debug!("rotation latched (rotation {rotation:.1} > scale {scale:.1})");
            self.rotating = true;
        }
        self.rotating
    }

    /// Whether a release was captured since the last down.
    #[must_use]
    pub fn has_release(&self) -> bool {
        self.release.is_some()
    }

    /// Captures the dominant gesture at the first up after movement.
    ///
    /// Candidates are the move speed, the scale magnitude, and the rotation
    /// magnitude (only while latched). Ties favor rotation, then scale.
    /// `focus` and `span` are the values before the up frame is applied, and
    /// `release_speed` is the pointers' combined speed.
    pub fn capture_release(
        &mut self,
        velocities: &GestureVelocities,
        focus: Option<Point>,
        span: Option<f64>,
        release_speed: f64,
        timestamp: u64,
    ) {
        let movement = velocities.move_sum();
        let speed = movement.length();
        let scale = velocities.sum(VelocityChannel::Scale);
        let rotation = velocities.sum(VelocityChannel::Rotation);
        let rotation_magnitude = if self.rotating { rotation.abs() } else { 0.0 };
        let dominant = rotation_magnitude.max(scale.abs()).max(speed);

        let plan = if dominant == rotation_magnitude {
            let velocity = rotation / VELOCITY_WINDOW as f64;
            focus.zip(span).map(|(anchor, start_span)| FlingPlan::Rotate {
                velocity: if velocity.is_finite() { velocity } else { 0.0 },
                anchor,
                start_span,
            })
        } else if dominant == scale.abs() {
            focus.zip(span).map(|(anchor, start_span)| FlingPlan::Scale {
                speed: release_speed,
                zoom_in: scale > 0.0,
                anchor,
                start_span,
            })
        } else {
            Some(FlingPlan::Move {
                velocity: movement / speed * release_speed,
            })
        };
        log::debug!("release captured at {timestamp}: {plan:?}");
        self.release = Some(Release { plan, timestamp });
    }

    /// Takes the captured release if `now` is within `window` of its capture.
    ///
    /// The release is consumed either way.
    pub fn take_release_within(&mut self, now: u64, window: u64) -> Option<Release> {
        self.release
            .take()
            .filter(|release| now.saturating_sub(release.timestamp) < window)
    }

    /// Drops the captured release. A new down does this.
    pub fn clear_release(&mut self) {
        self.release = None;
    }

    /// Unlatches rotation and forgets everything. Full release does this.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
