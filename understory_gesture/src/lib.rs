// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: multi-touch gesture recognition with inertial flings.
//!
//! [`GestureEngine`] consumes raw multi-pointer touch frames and reports
//! semantic gestures through a [`GestureListener`]:
//!
//! - pan (`on_move`), pinch (`on_scale`) and twist (`on_rotate`) while
//!   pointers move;
//! - a decelerating continuation of whichever of the three dominated when the
//!   pointers lift, followed by `on_end`;
//! - single taps, double taps and long-presses.
//!
//! The engine is headless and never reads a clock. Every frame carries its own
//! timestamp, the host calls [`GestureEngine::tick`] with the current time on
//! each animation frame while [`GestureEngine::is_animating`] is `true`, and
//! timed outcomes (click confirmation, long-press) are handed to a
//! [`Scheduler`] and run later through [`GestureEngine::run_deferred`].
//! [`TimerQueue`](understory_timing::TimerQueue) implements [`Scheduler`], so
//! a host without its own timers can drain one on every frame.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_gesture::{DeferredAction, GestureEngine, GestureEvent, PointerSample, TouchFrame};
//! use understory_timing::TimerQueue;
//!
//! let mut engine = GestureEngine::default();
//! let mut events: Vec<GestureEvent> = Vec::new();
//! let mut timers: TimerQueue<DeferredAction> = TimerQueue::new();
//!
//! let finger = PointerSample::new(0, 10.0, 10.0);
//! engine.process_event(&TouchFrame::down(0, finger), &mut events, &mut timers)?;
//! engine.process_event(&TouchFrame::up(50, finger), &mut events, &mut timers)?;
//! assert!(events.is_empty(), "a tap is only a click once no second tap follows");
//!
//! // Later, the host runs whatever became due.
//! for action in timers.drain_due(400) {
//!     engine.run_deferred(action, &mut events);
//! }
//! assert_eq!(events, [GestureEvent::Click(finger.position)]);
//! # Ok::<(), understory_gesture::FrameError>(())
//! ```
//!
//! ## Arbitration
//!
//! Two-finger motion usually mixes translation, span change and rotation. The
//! engine keeps six-frame windows of the three velocities. Once a window has
//! filled, it latches rotation if rotation beats scale, and the latch holds
//! until all pointers lift; only a latched gesture reports `on_rotate`. At the
//! first release the largest of the three decides which fling follows.
//!
//! The building blocks are public for hosts that want to assemble their own
//! recognizer: [`geometry`], [`velocity`], [`tracker`], [`classifier`] and
//! [`tap`].
//!
//! ## Features
//!
//! - `std` (default): use the standard library for float math.
//! - `libm`: use `libm` for float math in `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod classifier;
pub mod geometry;
pub mod tap;
pub mod tracker;
pub mod velocity;

mod config;
mod engine;
mod frame;
mod listener;
mod schedule;

pub use config::GestureConfig;
pub use engine::GestureEngine;
pub use frame::{FrameError, PointerId, PointerSample, TouchAction, TouchFrame};
pub use listener::{GestureEvent, GestureListener};
pub use schedule::Scheduler;
pub use tap::DeferredAction;
