// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap, double-tap and long-press arbitration.
//!
//! Timed outcomes are not cancelled when they become moot. Instead each
//! [`DeferredAction`] is checked against the current state when it fires:
//! long-presses carry the generation of the down that scheduled them, and
//! click confirmations only fire while a single tap is still pending.

use kurbo::Point;

use crate::config::GestureConfig;

/// Work the engine hands to the host to run later through
/// [`GestureEngine::run_deferred`](crate::GestureEngine::run_deferred).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeferredAction {
    /// Fire a long-press if the pointer that went down with `generation` is
    /// still held in place.
    LongPress {
        /// Generation of the down that scheduled the check.
        generation: u64,
    },
    /// Fire a click at `position` unless a second tap arrived meanwhile.
    ConfirmClick {
        /// Where the tap was released.
        position: Point,
    },
}

/// What the last pointer going up means for tapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TapRelease {
    /// A single tap that becomes a click once `delay` passes without a
    /// second tap.
    PendingClick {
        /// Milliseconds to wait before running `action`.
        delay: u64,
        /// The confirmation to run.
        action: DeferredAction,
    },
    /// A completed double tap at the given position.
    DoubleClick(Point),
}

/// Timing and spatial state of tap recognition.
#[derive(Clone, Debug, Default)]
pub struct TapArbiter {
    count: u8,
    anchor: Point,
    window_start: u64,
    generation: u64,
}

impl TapArbiter {
    /// Creates an arbiter with no tap in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Taps counted in the current window.
    #[must_use]
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Where the current tap sequence started.
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Generation of the latest down.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Handles a down.
    ///
    /// `pointer_count` counts every pointer down after this frame. Returns the
    /// delay and action of a long-press check when one should be scheduled;
    /// `long_press_allowed` suppresses it, for instance when the down
    /// interrupted a fling.
    pub fn on_down(
        &mut self,
        position: Point,
        pointer_count: usize,
        now: u64,
        config: &GestureConfig,
        long_press_allowed: bool,
    ) -> Option<(u64, DeferredAction)> {
        self.generation = self.generation.wrapping_add(1);

        if now.saturating_sub(self.window_start) > config.double_tap_window_ms
            || pointer_count > 1
            || position.distance(self.anchor) > config.tap_slop()
        {
            self.count = 0;
        }
        if self.count == 0 {
            self.window_start = now;
            self.anchor = position;
        }
        self.count = self.count.saturating_add(1);

        (long_press_allowed && pointer_count == 1 && self.count == 1).then_some((
            config.long_press_delay_ms,
            DeferredAction::LongPress {
                generation: self.generation,
            },
        ))
    }

    /// Handles the last pointer going up at `position`.
    ///
    /// `last_focus` is the focus before the up frame, where a double tap is
    /// reported.
    pub fn on_last_up(
        &mut self,
        position: Point,
        last_focus: Point,
        now: u64,
        config: &GestureConfig,
    ) -> Option<TapRelease> {
        if self.count > 0 && now.saturating_sub(self.window_start) > config.tap_timeout_ms {
            self.count = 0;
            return None;
        }
        match self.count {
            1 if position.distance(self.anchor) < config.tap_slop() => {
                Some(TapRelease::PendingClick {
                    delay: config.click_delay_ms,
                    action: DeferredAction::ConfirmClick { position },
                })
            }
            2 => {
                self.count = 0;
                Some(TapRelease::DoubleClick(last_focus))
            }
            _ => None,
        }
    }

    /// Checks a long-press scheduled with `generation`.
    ///
    /// Returns the anchor to report if no other down happened since, exactly
    /// one pointer is `active`, the tap is still single and `focus` stayed
    /// within the long-press slop.
    #[must_use]
    pub fn long_press_due(
        &self,
        generation: u64,
        active: usize,
        focus: Option<Point>,
        config: &GestureConfig,
    ) -> Option<Point> {
        let held_still = focus
            .is_some_and(|focus| focus.distance(self.anchor) < config.long_press_slop);
        (generation == self.generation && active == 1 && self.count == 1 && held_still)
            .then_some(self.anchor)
    }

    /// Confirms a pending single tap. Returns `false` if the tap was upgraded
    /// or abandoned meanwhile.
    pub fn confirm_click(&mut self) -> bool {
        if self.count == 1 {
            self.count = 0;
            true
        } else {
            false
        }
    }
}
