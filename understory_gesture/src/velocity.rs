// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Windowed velocity buffers.
//!
//! Every processed move frame writes one instantaneous velocity per channel
//! into the slot under a shared cursor, then the cursor advances. The sum of a
//! channel's slots is the smoothed velocity used to classify gestures. It is a
//! plain sum, not a mean, so a window that has not filled up yet reads low.

use kurbo::Vec2;

/// Number of frames a velocity window spans.
pub const VELOCITY_WINDOW: usize = 6;

/// Ring of per-channel samples sharing one write cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityRing<const CHANNELS: usize, const SLOTS: usize> {
    slots: [[f64; SLOTS]; CHANNELS],
    cursor: usize,
}

impl<const CHANNELS: usize, const SLOTS: usize> Default for VelocityRing<CHANNELS, SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CHANNELS: usize, const SLOTS: usize> VelocityRing<CHANNELS, SLOTS> {
    /// Creates a zero-filled ring.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [[0.0; SLOTS]; CHANNELS],
            cursor: 0,
        }
    }

    /// Overwrites the slot under the cursor for `channel`.
    ///
    /// Out-of-range channels are ignored.
    pub fn record(&mut self, channel: usize, value: f64) {
        if let Some(slot) = self
            .slots
            .get_mut(channel)
            .and_then(|slots| slots.get_mut(self.cursor))
        {
            *slot = value;
        }
    }

    /// Moves the cursor to the next slot, wrapping around.
    pub fn advance(&mut self) {
        if SLOTS > 0 {
            self.cursor = (self.cursor + 1) % SLOTS;
        }
    }

    /// Sum of every slot of `channel`.
    #[must_use]
    pub fn sum(&self, channel: usize) -> f64 {
        self.slots
            .get(channel)
            .map_or(0.0, |slots| slots.iter().sum())
    }

    /// Zero-fills every channel and rewinds the cursor.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Index of the slot the next [`Self::record`] writes.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

/// The velocities the gesture classifier watches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VelocityChannel {
    /// Horizontal focus velocity.
    MoveX,
    /// Vertical focus velocity.
    MoveY,
    /// Rate of change of the span.
    Scale,
    /// Arc velocity of the pointers around the focus.
    Rotation,
}

impl VelocityChannel {
    /// Number of channels.
    pub const COUNT: usize = 4;

    /// Position of this channel in a [`VelocityRing`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::MoveX => 0,
            Self::MoveY => 1,
            Self::Scale => 2,
            Self::Rotation => 3,
        }
    }
}

/// Move, scale and rotation velocity windows of one gesture.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureVelocities {
    ring: VelocityRing<{ VelocityChannel::COUNT }, VELOCITY_WINDOW>,
}

impl GestureVelocities {
    /// Creates zero-filled windows.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: VelocityRing::new(),
        }
    }

    /// Writes the current frame's velocity for `channel`.
    pub fn record(&mut self, channel: VelocityChannel, value: f64) {
        self.ring.record(channel.index(), value);
    }

    /// Writes both move channels.
    pub fn record_move(&mut self, velocity: Vec2) {
        self.record(VelocityChannel::MoveX, velocity.x);
        self.record(VelocityChannel::MoveY, velocity.y);
    }

    /// Windowed sum of `channel`.
    #[must_use]
    pub fn sum(&self, channel: VelocityChannel) -> f64 {
        self.ring.sum(channel.index())
    }

    /// Windowed sum of both move channels.
    #[must_use]
    pub fn move_sum(&self) -> Vec2 {
        Vec2::new(
            self.sum(VelocityChannel::MoveX),
            self.sum(VelocityChannel::MoveY),
        )
    }

    /// Ends the current frame.
    pub fn advance(&mut self) {
        self.ring.advance();
    }

    /// Zero-fills every window.
    pub fn clear(&mut self) {
        self.ring.clear();
    }

    /// Slot the current frame writes to.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.ring.cursor()
    }
}

/// Converts a per-frame change into a per-second rate.
///
/// A zero `dt_ms` or a non-finite result yields `0.0`.
#[must_use]
pub fn per_second(delta: f64, dt_ms: u64) -> f64 {
    if dt_ms == 0 {
        return 0.0;
    }
    let rate = delta * 1000.0 / dt_ms as f64;
    if rate.is_finite() { rate } else { 0.0 }
}

/// Focus velocity for a focus displacement over `dt_ms`.
#[must_use]
pub fn move_velocity(delta: Vec2, dt_ms: u64) -> Vec2 {
    Vec2::new(per_second(delta.x, dt_ms), per_second(delta.y, dt_ms))
}

/// Span growth rate for a span change over `dt_ms`.
#[must_use]
pub fn scale_velocity(span: f64, last_span: f64, dt_ms: u64) -> f64 {
    per_second(span - last_span, dt_ms)
}

/// Arc velocity for a rotation of `angle` radians at radius `span` over `dt_ms`.
#[must_use]
pub fn rotation_velocity(angle: f64, span: f64, dt_ms: u64) -> f64 {
    per_second(angle * span, dt_ms)
}
