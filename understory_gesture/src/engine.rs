// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};
use understory_inertia::Fling;

use crate::classifier::{FlingPlan, GestureClassifier};
use crate::config::GestureConfig;
use crate::frame::{FrameError, TouchAction, TouchFrame};
use crate::geometry::{PointerHistory, compute_focus, compute_rotation_delta, compute_span};
use crate::listener::GestureListener;
use crate::schedule::Scheduler;
use crate::tap::{DeferredAction, TapArbiter, TapRelease};
use crate::tracker::PointerVelocityTracker;
use crate::velocity::{
    GestureVelocities, VelocityChannel, move_velocity, rotation_velocity, scale_velocity,
};

/// What a running fling drives.
#[derive(Clone, Copy, Debug, PartialEq)]
enum FlingMode {
    Idle,
    Rotate { anchor: Point, start_span: f64 },
    Scale { anchor: Point, zoom_in: bool },
    Move,
}

/// Turns touch frames into gesture callbacks and inertial continuations.
///
/// The engine has three entry points, all of which must be called from the
/// same logical thread:
///
/// - [`process_event`](Self::process_event) for every touch frame;
/// - [`run_deferred`](Self::run_deferred) for each action handed to the
///   [`Scheduler`] once it is due;
/// - [`tick`](Self::tick) once per animation frame while
///   [`is_animating`](Self::is_animating) is `true`.
#[derive(Clone, Debug)]
pub struct GestureEngine {
    config: GestureConfig,
    focus: Option<Point>,
    span: Option<f64>,
    history: PointerHistory,
    velocities: GestureVelocities,
    trackers: PointerVelocityTracker,
    classifier: GestureClassifier,
    taps: TapArbiter,
    fling: Fling,
    mode: FlingMode,
    fling_previous: Point,
    end_owed: bool,
    active_pointers: usize,
    moved: bool,
    last_time: Option<u64>,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureEngine {
    /// Creates an engine with no pointers down.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            focus: None,
            span: None,
            history: PointerHistory::new(),
            velocities: GestureVelocities::new(),
            trackers: PointerVelocityTracker::new(),
            classifier: GestureClassifier::new(),
            taps: TapArbiter::new(),
            fling: Fling::new(config.fling_curve()),
            mode: FlingMode::Idle,
            fling_previous: Point::ZERO,
            end_owed: false,
            active_pointers: 0,
            moved: false,
            last_time: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Centroid of the active pointers, once any pointer went down.
    #[must_use]
    pub fn focus(&self) -> Option<Point> {
        self.focus
    }

    /// Spread of the active pointers while at least two are down.
    #[must_use]
    pub fn span(&self) -> Option<f64> {
        self.span
    }

    /// Whether the current multi-pointer gesture is latched as a rotation.
    #[must_use]
    pub fn is_rotating(&self) -> bool {
        self.classifier.is_rotating()
    }

    /// Number of pointers down after the last processed frame.
    #[must_use]
    pub fn active_pointers(&self) -> usize {
        self.active_pointers
    }

    /// Whether [`tick`](Self::tick) still has work to do.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.fling.is_finished() || self.end_owed
    }

    /// Processes one touch frame.
    ///
    /// Malformed frames are rejected without touching any state.
    pub fn process_event<L, S>(
        &mut self,
        frame: &TouchFrame,
        listener: &mut L,
        scheduler: &mut S,
    ) -> Result<(), FrameError>
    where
        L: GestureListener + ?Sized,
        S: Scheduler + ?Sized,
    {
        if let Err(err) = frame.validate() {
            log::trace!("rejected touch frame: {err}");
            return Err(err);
        }
        if frame.action == TouchAction::Move {
            self.handle_move(frame, listener);
        } else {
            self.handle_transition(frame, listener, scheduler);
        }
        Ok(())
    }

    fn handle_move<L: GestureListener + ?Sized>(&mut self, frame: &TouchFrame, listener: &mut L) {
        let now = frame.timestamp;
        let dt = self.last_time.map_or(0, |last| now.saturating_sub(last));
        self.trackers.add_frame(frame);
        self.active_pointers = frame.active_count();

        let last_focus = self.focus;
        if let Some(focus) = compute_focus(frame) {
            self.focus = Some(focus);
        }
        let delta = match (last_focus, self.focus) {
            (Some(last), Some(focus)) => focus - last,
            _ => Vec2::ZERO,
        };
        if last_focus.is_some() && delta.is_finite() {
            listener.on_move(delta);
        }
        self.velocities.record_move(move_velocity(delta, dt));

        if let Some(focus) = self.focus
            && frame.active_count() >= 2
        {
            let last_span = self.span;
            self.span = compute_span(frame, focus);

            let mut scale = 0.0;
            if let (Some(last), Some(span)) = (last_span, self.span) {
                let factor = span / last;
                if factor.is_finite() {
                    listener.on_scale(focus, factor);
                }
                scale = scale_velocity(span, last, dt);
            }
            self.velocities.record(VelocityChannel::Scale, scale);

            let angle = compute_rotation_delta(
                frame,
                focus,
                last_focus.unwrap_or(focus),
                &mut self.history,
            );
            self.velocities.record(
                VelocityChannel::Rotation,
                rotation_velocity(angle, self.span.unwrap_or(0.0), dt),
            );
            if self.classifier.is_rotating() && angle.is_finite() {
                listener.on_rotate(focus, angle);
            }
            self.classifier.probe(&self.velocities);
        }

        self.last_time = Some(now);
        self.velocities.advance();
        self.moved = true;
    }

    fn handle_transition<L, S>(&mut self, frame: &TouchFrame, listener: &mut L, scheduler: &mut S)
    where
        L: GestureListener + ?Sized,
        S: Scheduler + ?Sized,
    {
        let now = frame.timestamp;
        self.classifier.reset_probe();

        if self.moved && frame.action.is_up() && !self.classifier.has_release() {
            let speed = self.trackers.release_speed(frame);
            self.classifier
                .capture_release(&self.velocities, self.focus, self.span, speed, now);
        }

        let last_focus = self.focus;
        if let Some(focus) = compute_focus(frame) {
            self.focus = Some(focus);
        }
        self.span = self.focus.and_then(|focus| compute_span(frame, focus));
        self.history.record_frame(frame);
        if let Some(lifting) = frame.lifting() {
            self.history.remove(lifting.id);
            self.trackers.remove(lifting.id);
        }
        self.active_pointers = frame.active_count();

        if let Some(position) = frame.action_position() {
            match frame.action {
                TouchAction::Down | TouchAction::PointerDown => {
                    self.classifier.clear_release();
                    let was_flinging = !self.fling.is_finished();
                    self.stop(listener);
                    if let Some((delay, action)) = self.taps.on_down(
                        position,
                        frame.pointers.len(),
                        now,
                        &self.config,
                        !was_flinging,
                    ) {
                        scheduler.schedule(now, delay, action);
                    }
                }
                TouchAction::Up => {
                    self.release_last_pointer(position, last_focus, now, listener, scheduler);
                }
                TouchAction::PointerUp | TouchAction::Move => {}
            }
        }

        self.last_time = Some(now);
        self.moved = false;
    }

    fn release_last_pointer<L, S>(
        &mut self,
        position: Point,
        last_focus: Option<Point>,
        now: u64,
        listener: &mut L,
        scheduler: &mut S,
    ) where
        L: GestureListener + ?Sized,
        S: Scheduler + ?Sized,
    {
        if let Some(release) = self
            .classifier
            .take_release_within(now, self.config.release_window_ms)
        {
            if let Some(plan) = release.plan {
                self.start_fling(plan, release.timestamp);
            }
            self.end_owed = true;
        }

        match self.taps.on_last_up(
            position,
            last_focus.unwrap_or(position),
            now,
            &self.config,
        ) {
            Some(TapRelease::PendingClick { delay, action }) => {
                scheduler.schedule(now, delay, action);
            }
            Some(TapRelease::DoubleClick(at)) => listener.on_double_click(at),
            None => {}
        }

        self.history.clear();
        self.span = None;
        self.velocities.clear();
        self.classifier.reset();
        self.trackers.clear();
    }

    fn start_fling(&mut self, plan: FlingPlan, start_time: u64) {
        let (mode, origin, velocity) = match plan {
            FlingPlan::Rotate {
                velocity,
                anchor,
                start_span,
            } => (
                FlingMode::Rotate { anchor, start_span },
                Point::ZERO,
                Vec2::new(velocity, 0.0),
            ),
            FlingPlan::Scale {
                speed,
                zoom_in,
                anchor,
                start_span,
            } => (
                FlingMode::Scale { anchor, zoom_in },
                Point::new(start_span, 0.0),
                Vec2::new(speed, 0.0),
            ),
            FlingPlan::Move { velocity } => (FlingMode::Move, Point::ZERO, velocity),
        };
        if !velocity.is_finite() || velocity == Vec2::ZERO || !origin.is_finite() {
            log::debug!("no fling for {plan:?}");
            return;
        }
        log::debug!("fling started at {start_time}: {plan:?}");
        self.mode = mode;
        self.fling_previous = origin;
        self.fling.start(origin, velocity, start_time);
    }

    /// Runs a deferred action the engine handed to the [`Scheduler`].
    ///
    /// Actions made stale by later input are ignored.
    pub fn run_deferred<L: GestureListener + ?Sized>(
        &mut self,
        action: DeferredAction,
        listener: &mut L,
    ) {
        match action {
            DeferredAction::LongPress { generation } => {
                match self.taps.long_press_due(
                    generation,
                    self.active_pointers,
                    self.focus,
                    &self.config,
                ) {
                    Some(anchor) => listener.on_long_click(anchor),
                    None => log::trace!("stale long-press for generation {generation}"),
                }
            }
            DeferredAction::ConfirmClick { position } => {
                if self.taps.confirm_click() {
                    listener.on_click(position);
                } else {
                    log::trace!("stale click confirmation at {position:?}");
                }
            }
        }
    }

    /// Advances a running fling to `now`.
    ///
    /// Returns `true` while the fling moved. The first call after it settles
    /// returns `false` and fires the owed [`GestureListener::on_end`].
    pub fn tick<L: GestureListener + ?Sized>(&mut self, now: u64, listener: &mut L) -> bool {
        if !self.fling.compute(now) {
            self.mode = FlingMode::Idle;
            self.finish(listener);
            return false;
        }

        let current = self.fling.current();
        let previous = core::mem::replace(&mut self.fling_previous, current);
        match self.mode {
            FlingMode::Rotate { anchor, start_span } => {
                let angle = (current.x - previous.x) / start_span;
                if angle.is_finite() {
                    listener.on_rotate(anchor, angle);
                }
            }
            FlingMode::Scale { anchor, zoom_in } => {
                let factor = if zoom_in {
                    current.x / previous.x
                } else {
                    previous.x / current.x
                };
                if factor.is_finite() {
                    listener.on_scale(anchor, factor);
                }
            }
            FlingMode::Move => {
                let delta = current - previous;
                if delta.is_finite() {
                    listener.on_move(delta);
                }
            }
            FlingMode::Idle => {}
        }
        true
    }

    /// Stops a running fling where it is, firing the owed
    /// [`GestureListener::on_end`].
    pub fn stop<L: GestureListener + ?Sized>(&mut self, listener: &mut L) {
        if !self.fling.is_finished() {
            log::debug!("fling stopped at {:?}", self.fling.current());
        }
        self.fling.force_finish();
        self.mode = FlingMode::Idle;
        self.finish(listener);
    }

    fn finish<L: GestureListener + ?Sized>(&mut self, listener: &mut L) {
        if self.end_owed {
            self.end_owed = false;
            listener.on_end();
        }
    }
}
