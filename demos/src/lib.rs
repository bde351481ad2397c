// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless building blocks for the gesture demos.
//!
//! - [`Camera`]: a content transform owned by the caller and driven through
//!   [`GestureListener`] callbacks, the way a map or photo viewer would be.
//! - [`Host`]: a stand-in for a platform event loop. It feeds frames, runs
//!   deferred actions from a [`TimerQueue`] and ticks flings at a fixed
//!   frame interval.
//! - [`script`]: synthetic touch input for common gestures.
//!
//! Run the demo with:
//! - `cargo run -p understory_demos --example gesture_camera`

use kurbo::{Affine, Point, Vec2};
use understory_gesture::{
    DeferredAction, FrameError, GestureEngine, GestureListener, TouchFrame,
};
use understory_timing::TimerQueue;

/// Content transform driven by gestures.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Content-to-screen transform.
    pub transform: Affine,
    /// Accumulated zoom factor.
    pub zoom: f64,
    /// Accumulated rotation in radians.
    pub angle: f64,
    /// Confirmed single taps.
    pub clicks: usize,
    /// Double taps.
    pub double_clicks: usize,
    /// Long-presses.
    pub long_clicks: usize,
    /// Completed or stopped flings.
    pub flings_ended: usize,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            zoom: 1.0,
            angle: 0.0,
            clicks: 0,
            double_clicks: 0,
            long_clicks: 0,
            flings_ended: 0,
        }
    }
}

impl Camera {
    /// Where the content origin ends up on screen.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.transform * Point::ZERO
    }
}

impl GestureListener for Camera {
    fn on_move(&mut self, delta: Vec2) {
        self.transform = self.transform.then_translate(delta);
    }

    fn on_scale(&mut self, focus: Point, factor: f64) {
        self.transform = self.transform.then_scale_about(factor, focus);
        self.zoom *= factor;
    }

    fn on_rotate(&mut self, focus: Point, angle: f64) {
        self.transform = self.transform.then_rotate_about(angle, focus);
        self.angle += angle;
    }

    fn on_click(&mut self, position: Point) {
        log::info!("click at {position:?}");
        self.clicks += 1;
    }

    fn on_double_click(&mut self, position: Point) {
        log::info!("double click at {position:?}");
        self.double_clicks += 1;
    }

    fn on_long_click(&mut self, position: Point) {
        log::info!("long click at {position:?}");
        self.long_clicks += 1;
    }

    fn on_end(&mut self) {
        log::debug!("fling ended");
        self.flings_ended += 1;
    }
}

/// A headless event loop around a [`GestureEngine`].
#[derive(Debug)]
pub struct Host<L> {
    engine: GestureEngine,
    timers: TimerQueue<DeferredAction>,
    listener: L,
    frame_interval: u64,
    now: u64,
}

impl<L: GestureListener> Host<L> {
    /// Creates a host delivering gestures to `listener` and ticking flings
    /// every `frame_interval` milliseconds.
    pub fn new(engine: GestureEngine, listener: L, frame_interval: u64) -> Self {
        Self {
            engine,
            timers: TimerQueue::new(),
            listener,
            frame_interval: frame_interval.max(1),
            now: 0,
        }
    }

    /// The gesture receiver.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// The engine.
    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    /// Current time of the loop in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Runs timers and fling ticks up to the frame's time, then delivers the frame.
    pub fn feed(&mut self, frame: &TouchFrame) -> Result<(), FrameError> {
        self.advance_to(frame.timestamp);
        self.engine
            .process_event(frame, &mut self.listener, &mut self.timers)
    }

    /// Delivers every frame of a script in order.
    pub fn play(&mut self, frames: &[TouchFrame]) -> Result<(), FrameError> {
        frames.iter().try_for_each(|frame| self.feed(frame))
    }

    /// Runs timers and fling ticks due up to `target`.
    pub fn advance_to(&mut self, target: u64) {
        self.pump(target);
        self.now = self.now.max(target);
    }

    /// Runs until no fling is animating and no timer is pending. Returns the
    /// time reached.
    pub fn settle(&mut self) -> u64 {
        self.pump(u64::MAX);
        self.now
    }

    fn pump(&mut self, limit: u64) {
        loop {
            let next_tick = self
                .engine
                .is_animating()
                .then(|| self.now.saturating_add(self.frame_interval));
            let next_timer = self.timers.next_deadline();
            let next = match (next_tick, next_timer) {
                (Some(tick), Some(timer)) => Some(tick.min(timer)),
                (tick, timer) => tick.or(timer),
            };
            let Some(at) = next.filter(|at| *at <= limit) else {
                break;
            };

            self.now = self.now.max(at);
            while let Some(action) = self.timers.pop_due(self.now) {
                self.engine.run_deferred(action, &mut self.listener);
            }
            if next_tick == Some(at) {
                self.engine.tick(at, &mut self.listener);
            }
        }
    }
}

/// Synthetic touch input.
///
/// Every script starts at `start` and spaces its frames `interval`
/// milliseconds apart.
pub mod script {
    use kurbo::{Point, Vec2};
    use understory_gesture::{PointerSample, TouchFrame};

    /// A quick tap at `at`.
    pub fn tap(at: Point, start: u64) -> Vec<TouchFrame> {
        let finger = PointerSample::new(0, at.x, at.y);
        vec![TouchFrame::down(start, finger), TouchFrame::up(start + 50, finger)]
    }

    /// A finger held at `at` for `hold` milliseconds.
    pub fn hold(at: Point, start: u64, hold: u64) -> Vec<TouchFrame> {
        let finger = PointerSample::new(0, at.x, at.y);
        vec![TouchFrame::down(start, finger), TouchFrame::up(start + hold, finger)]
    }

    /// One finger dragged from `from` at `velocity` (units per second) for
    /// `steps` frames, then lifted without pausing.
    pub fn pan(from: Point, velocity: Vec2, steps: u32, start: u64, interval: u64) -> Vec<TouchFrame> {
        let per_frame = velocity * (interval as f64 / 1000.0);
        let mut frames = vec![TouchFrame::down(start, PointerSample::new(0, from.x, from.y))];
        let mut at = from;
        for step in 1..=u64::from(steps) {
            at += per_frame;
            frames.push(TouchFrame::moved(
                start + step * interval,
                [PointerSample::new(0, at.x, at.y)],
            ));
        }
        let end = start + u64::from(steps) * interval + interval / 2;
        frames.push(TouchFrame::up(end, PointerSample::new(0, at.x, at.y)));
        frames
    }

    fn pair(center: Point, radius: f64, angle: f64) -> [PointerSample; 2] {
        let offset = Vec2::from_angle(angle) * radius;
        let a = center + offset;
        let b = center - offset;
        [PointerSample::new(0, a.x, a.y), PointerSample::new(1, b.x, b.y)]
    }

    /// Two fingers placed by `place(k)` for frames `0..=steps`, then lifted
    /// one after the other.
    fn two_fingers(
        steps: u32,
        start: u64,
        interval: u64,
        place: impl Fn(f64) -> [PointerSample; 2],
    ) -> Vec<TouchFrame> {
        let first = place(0.0);
        let mut frames = vec![
            TouchFrame::down(start, first[0]),
            TouchFrame::pointer_down(start + interval, first),
        ];
        for step in 1..=steps {
            frames.push(TouchFrame::moved(
                start + u64::from(step + 1) * interval,
                place(f64::from(step)),
            ));
        }
        let last = place(f64::from(steps));
        let end = start + u64::from(steps + 1) * interval + interval / 2;
        frames.push(TouchFrame::pointer_up(end, last, 1));
        frames.push(TouchFrame::up(end + 4, last[0]));
        frames
    }

    /// Two fingers spreading (or closing) horizontally about `center` from
    /// `from_span` to `to_span`.
    pub fn pinch(
        center: Point,
        from_span: f64,
        to_span: f64,
        steps: u32,
        start: u64,
        interval: u64,
    ) -> Vec<TouchFrame> {
        let growth = (to_span - from_span) / f64::from(steps.max(1));
        two_fingers(steps, start, interval, |k| {
            pair(center, from_span + growth * k, 0.0)
        })
    }

    /// Two fingers turning by `angle` radians about `center`.
    ///
    /// Hands never twist perfectly in place, so the pair also drifts and
    /// spreads a little.
    pub fn twist(
        center: Point,
        radius: f64,
        angle: f64,
        steps: u32,
        start: u64,
        interval: u64,
    ) -> Vec<TouchFrame> {
        let turn = angle / f64::from(steps.max(1));
        two_fingers(steps, start, interval, |k| {
            pair(center + Vec2::new(0.5 * k, 0.0), radius + 0.1 * k, turn * k)
        })
    }
}
