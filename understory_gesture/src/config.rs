// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_inertia::FlingCurve;

/// Thresholds and timings of gesture recognition.
///
/// Distances are in the coordinate space of the touch frames unless stated
/// otherwise; times are in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Device pixels per density-independent pixel (`1.0` at 160 ppi).
    pub density: f64,
    /// Tap slop in density-independent pixels, see [`Self::tap_slop`].
    pub tap_slop_dp: f64,
    /// How far the focus may drift before a long-press no longer fires.
    pub long_press_slop: f64,
    /// Longest gap between the first down and a second down of a double tap.
    pub double_tap_window_ms: u64,
    /// Longest time from the first down to a release that still counts as a tap.
    pub tap_timeout_ms: u64,
    /// Wait after a single tap before it is confirmed as a click.
    pub click_delay_ms: u64,
    /// Hold time before a long-press fires.
    pub long_press_delay_ms: u64,
    /// Longest time between the first release after movement and the last
    /// pointer lifting for the gesture to continue as a fling.
    pub release_window_ms: u64,
    /// Friction of fling deceleration.
    pub fling_friction: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            tap_slop_dp: 16.0,
            long_press_slop: 8.0,
            double_tap_window_ms: 400,
            tap_timeout_ms: 300,
            click_delay_ms: 300,
            long_press_delay_ms: 500,
            release_window_ms: 128,
            fling_friction: FlingCurve::DEFAULT_FRICTION,
        }
    }
}

impl GestureConfig {
    /// Sets [`Self::density`].
    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Sets [`Self::tap_slop_dp`].
    #[must_use]
    pub fn with_tap_slop_dp(mut self, slop: f64) -> Self {
        self.tap_slop_dp = slop;
        self
    }

    /// Sets [`Self::long_press_slop`].
    #[must_use]
    pub fn with_long_press_slop(mut self, slop: f64) -> Self {
        self.long_press_slop = slop;
        self
    }

    /// Sets [`Self::double_tap_window_ms`].
    #[must_use]
    pub fn with_double_tap_window_ms(mut self, window: u64) -> Self {
        self.double_tap_window_ms = window;
        self
    }

    /// Sets [`Self::tap_timeout_ms`].
    #[must_use]
    pub fn with_tap_timeout_ms(mut self, timeout: u64) -> Self {
        self.tap_timeout_ms = timeout;
        self
    }

    /// Sets [`Self::click_delay_ms`].
    #[must_use]
    pub fn with_click_delay_ms(mut self, delay: u64) -> Self {
        self.click_delay_ms = delay;
        self
    }

    /// Sets [`Self::long_press_delay_ms`].
    #[must_use]
    pub fn with_long_press_delay_ms(mut self, delay: u64) -> Self {
        self.long_press_delay_ms = delay;
        self
    }

    /// Sets [`Self::release_window_ms`].
    #[must_use]
    pub fn with_release_window_ms(mut self, window: u64) -> Self {
        self.release_window_ms = window;
        self
    }

    /// Sets [`Self::fling_friction`].
    #[must_use]
    pub fn with_fling_friction(mut self, friction: f64) -> Self {
        self.fling_friction = friction;
        self
    }

    /// Tap slop in frame coordinates.
    #[must_use]
    pub fn tap_slop(&self) -> f64 {
        self.tap_slop_dp * self.density
    }

    /// Fling deceleration for this density and friction.
    #[must_use]
    pub fn fling_curve(&self) -> FlingCurve {
        FlingCurve::new(self.fling_friction, self.density)
    }
}

#[cfg(test)]
mod tests {
    use super::GestureConfig;

    #[test]
    fn slop_scales_with_density() {
        let config = GestureConfig::default();
        assert_eq!(config.tap_slop(), 16.0);
        assert_eq!(config.with_density(2.5).tap_slop(), 40.0);
        assert_eq!(config.with_tap_slop_dp(10.0).tap_slop(), 10.0);
    }

    #[test]
    fn fling_curve_uses_friction() {
        let config = GestureConfig::default().with_fling_friction(0.03);
        assert_eq!(config.fling_curve().friction(), 0.03);
    }
}
