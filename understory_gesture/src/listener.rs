// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture output.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

/// Receiver of recognized gestures.
///
/// Every method defaults to doing nothing, so consumers only implement what
/// they react to. Callbacks are made synchronously from within the engine's
/// entry points.
pub trait GestureListener {
    /// The focus moved by `delta`, or a pan fling advanced.
    fn on_move(&mut self, delta: Vec2) {
        let _ = delta;
    }

    /// The content should scale by `factor` around `focus`.
    fn on_scale(&mut self, focus: Point, factor: f64) {
        let _ = (focus, factor);
    }

    /// The content should rotate by `angle` radians around `focus`.
    fn on_rotate(&mut self, focus: Point, angle: f64) {
        let _ = (focus, angle);
    }

    /// A single tap was confirmed.
    fn on_click(&mut self, position: Point) {
        let _ = position;
    }

    /// A second tap completed a double tap.
    fn on_double_click(&mut self, position: Point) {
        let _ = position;
    }

    /// A single pointer was held still.
    fn on_long_click(&mut self, position: Point) {
        let _ = position;
    }

    /// A fling completed or was stopped.
    fn on_end(&mut self) {}
}

/// A recorded [`GestureListener`] callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// See [`GestureListener::on_move`].
    Move(Vec2),
    /// See [`GestureListener::on_scale`].
    Scale {
        /// Pivot of the scale.
        focus: Point,
        /// Scale factor.
        factor: f64,
    },
    /// See [`GestureListener::on_rotate`].
    Rotate {
        /// Pivot of the rotation.
        focus: Point,
        /// Angle in radians.
        angle: f64,
    },
    /// See [`GestureListener::on_click`].
    Click(Point),
    /// See [`GestureListener::on_double_click`].
    DoubleClick(Point),
    /// See [`GestureListener::on_long_click`].
    LongClick(Point),
    /// See [`GestureListener::on_end`].
    End,
}

impl GestureListener for Vec<GestureEvent> {
    fn on_move(&mut self, delta: Vec2) {
        self.push(GestureEvent::Move(delta));
    }

    fn on_scale(&mut self, focus: Point, factor: f64) {
        self.push(GestureEvent::Scale { focus, factor });
    }

    fn on_rotate(&mut self, focus: Point, angle: f64) {
        self.push(GestureEvent::Rotate { focus, angle });
    }

    fn on_click(&mut self, position: Point) {
        self.push(GestureEvent::Click(position));
    }

    fn on_double_click(&mut self, position: Point) {
        self.push(GestureEvent::DoubleClick(position));
    }

    fn on_long_click(&mut self, position: Point) {
        self.push(GestureEvent::LongClick(position));
    }

    fn on_end(&mut self) {
        self.push(GestureEvent::End);
    }
}

impl<L: GestureListener + ?Sized> GestureListener for &mut L {
    fn on_move(&mut self, delta: Vec2) {
        (**self).on_move(delta);
    }

    fn on_scale(&mut self, focus: Point, factor: f64) {
        (**self).on_scale(focus, factor);
    }

    fn on_rotate(&mut self, focus: Point, angle: f64) {
        (**self).on_rotate(focus, angle);
    }

    fn on_click(&mut self, position: Point) {
        (**self).on_click(position);
    }

    fn on_double_click(&mut self, position: Point) {
        (**self).on_double_click(position);
    }

    fn on_long_click(&mut self, position: Point) {
        (**self).on_long_click(position);
    }

    fn on_end(&mut self) {
        (**self).on_end();
    }
}
