// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_inertia --heading-base-level=0

//! Understory Inertia: decelerating fling motion for post-gesture animation.
//!
//! When a pan, pinch or rotation ends with the fingers still moving, UIs
//! usually let the content coast to a stop. This crate provides the physics for
//! that coasting:
//!
//! - [`FlingCurve`]: a friction model turning a launch speed into a duration and
//!   a travel distance, scaled by display density.
//! - [`SplineTable`]: the normalized distance-over-time spline the fling
//!   follows (fast start, smooth settle).
//! - [`Fling`]: a two-axis simulator polled with the host's clock.
//!
//! The crate is headless: it never reads a clock or schedules frames. Hosts
//! call [`Fling::compute`] from whatever animation-frame callback they have and
//! stop once it returns `false`.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_inertia::{Fling, FlingCurve};
//!
//! let mut fling = Fling::new(FlingCurve::with_density(2.0));
//! fling.start(Point::ZERO, Vec2::new(1_200.0, 0.0), 0);
//!
//! let mut now = 0;
//! let mut last = Point::ZERO;
//! let mut travelled = 0.0;
//! while fling.compute(now) {
//!     let delta = fling.current() - last;
//!     last = fling.current();
//!     // Apply `delta` to the content.
//!     travelled += delta.x;
//!     now += 16;
//! }
//! assert_eq!(last, fling.final_position());
//! assert!(travelled > 0.0);
//! ```
//!
//! One-dimensional users (a scale factor, a rotation angle) drive the `x`
//! axis only and remap the scalar to their own units.
//!
//! ## Features
//!
//! - `std` (default): use the standard library for float math.
//! - `libm`: use `libm` for float math in `no_std` builds.
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod fling;
mod spline;

pub use fling::Fling;
pub use spline::{FlingCurve, FlingInfo, SplineSample, SplineTable};
