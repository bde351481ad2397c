// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host capability for running deferred actions.

use understory_timing::TimerQueue;

use crate::tap::DeferredAction;

/// Host facility that runs a [`DeferredAction`] later.
///
/// Once `delay` milliseconds have passed since `now`, the host calls
/// [`GestureEngine::run_deferred`](crate::GestureEngine::run_deferred) with
/// the action. Actions never need cancelling: stale ones are ignored when
/// they run.
pub trait Scheduler {
    /// Requests that `action` runs `delay` milliseconds after `now`.
    fn schedule(&mut self, now: u64, delay: u64, action: DeferredAction);
}

impl Scheduler for TimerQueue<DeferredAction> {
    fn schedule(&mut self, now: u64, delay: u64, action: DeferredAction) {
        self.schedule_after(now, delay, action);
    }
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn schedule(&mut self, now: u64, delay: u64, action: DeferredAction) {
        (**self).schedule(now, delay, action);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use understory_timing::TimerQueue;

    use super::Scheduler;
    use crate::tap::DeferredAction;

    #[test]
    fn timer_queue_runs_actions_after_their_delay() {
        let mut timers = TimerQueue::new();
        let click = DeferredAction::ConfirmClick {
            position: Point::new(1.0, 2.0),
        };
        Scheduler::schedule(&mut timers, 50, 300, click);
        Scheduler::schedule(&mut timers, 0, 500, DeferredAction::LongPress { generation: 1 });

        assert_eq!(timers.pop_due(349), None);
        assert_eq!(timers.pop_due(350), Some(click));
        assert_eq!(
            timers.pop_due(500),
            Some(DeferredAction::LongPress { generation: 1 })
        );
    }
}
