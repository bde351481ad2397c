// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: host-agnostic timer queue primitives for UI runtimes.
//!
//! UI state machines often need to say "run this later" (confirm a tap once a
//! double-tap window closes, fire a long-press after a hold) without knowing
//! anything about the host's event loop. This crate provides a small,
//! deterministic [`TimerQueue`] that stores payloads keyed by an absolute
//! deadline in milliseconds. The host decides where time comes from: it
//! schedules payloads, asks for [`TimerQueue::next_deadline`] to arm its own
//! wake-up, and drains due payloads with [`TimerQueue::pop_due`].
//!
//! The queue never reads a clock itself, so tests can drive it with synthetic
//! timestamps.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_timing::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let _click = timers.schedule(300, "click");
//! let long_press = timers.schedule(500, "long-press");
//!
//! assert_eq!(timers.next_deadline(), Some(300));
//! assert_eq!(timers.pop_due(299), None);
//! assert_eq!(timers.pop_due(300), Some("click"));
//!
//! // Cancelled timers never come out of the queue.
//! assert!(timers.cancel(long_press));
//! assert_eq!(timers.pop_due(1_000), None);
//! assert!(timers.is_empty());
//! ```
//!
//! ## Ordering
//!
//! Payloads come out in deadline order. Payloads sharing a deadline come out in
//! the order they were scheduled.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::BinaryHeap;
use core::cmp::Ordering;

/// Handle identifying a scheduled timer, usable with [`TimerQueue::cancel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Returns the raw sequence number of this timer.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Entry<T> {
    deadline: u64,
    id: TimerId,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.id == other.id
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // `BinaryHeap` is a max-heap: invert so the earliest deadline (then the
    // lowest sequence number) sits at the top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Deadline-ordered queue of pending payloads.
///
/// Deadlines are absolute timestamps in milliseconds on whatever monotonic
/// clock the host uses.
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_id: 0,
        }
    }

    /// Schedules `payload` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.heap.push(Entry {
            deadline,
            id,
            payload,
        });
        id
    }

    /// Schedules `payload` to become due `delay` milliseconds after `now`.
    pub fn schedule_after(&mut self, now: u64, delay: u64, payload: T) -> TimerId {
        self.schedule(now.saturating_add(delay), payload)
    }

    /// Cancels a pending timer.
    ///
    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.heap.len();
        self.heap.retain(|entry| entry.id != id);
        self.heap.len() != before
    }

    /// Returns the earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.heap.peek().map(|entry| entry.deadline)
    }

    /// Removes and returns the earliest payload whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: u64) -> Option<T> {
        if self.next_deadline()? > now {
            return None;
        }
        self.heap.pop().map(|entry| entry.payload)
    }

    /// Returns an iterator draining every payload due at `now`, in order.
    pub fn drain_due(&mut self, now: u64) -> DrainDue<'_, T> {
        DrainDue { queue: self, now }
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

/// Iterator returned by [`TimerQueue::drain_due`].
#[derive(Debug)]
pub struct DrainDue<'a, T> {
    queue: &'a mut TimerQueue<T>,
    now: u64,
}

impl<T> Iterator for DrainDue<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.pop_due(self.now)
    }
}
