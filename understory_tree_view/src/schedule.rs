// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred rescale timers.
//!
//! A sync asks for the view to be refit a few times after the fact, so the
//! scale follows the boxes while they are still moving. The queue here only
//! stores due times; whoever drives the clock drains it.

use alloc::vec::Vec;
use core::time::Duration;

/// Cancellable queue of pending fit deadlines.
///
/// Deadlines from overlapping requests are kept side by side, not merged.
/// Each sync adds one deadline per configured delay and every tick drains
/// what is due, so the queue holds a handful of entries and a sorted `Vec`
/// is enough.
#[derive(Clone, Debug, Default)]
pub struct FitSchedule {
    // Ascending.
    due: Vec<Duration>,
}

impl FitSchedule {
    /// An empty schedule.
    pub const fn new() -> Self {
        Self { due: Vec::new() }
    }

    /// Add a deadline.
    pub fn schedule(&mut self, at: Duration) {
        let pos = self.due.partition_point(|d| *d <= at);
        self.due.insert(pos, at);
    }

    /// Add one deadline per delay, counted from `now`.
    pub fn schedule_after(&mut self, now: Duration, delays: &[Duration]) {
        for delay in delays {
            self.schedule(now.saturating_add(*delay));
        }
    }

    /// Remove every deadline at or before `now`, returning how many there were.
    pub fn take_due(&mut self, now: Duration) -> usize {
        let n = self.due.partition_point(|d| *d <= now);
        self.due.drain(..n);
        n
    }

    /// Drop every pending deadline.
    pub fn cancel_all(&mut self) {
        self.due.clear();
    }

    /// Earliest pending deadline.
    pub fn next_due(&self) -> Option<Duration> {
        self.due.first().copied()
    }

    /// Number of pending deadlines.
    pub fn len(&self) -> usize {
        self.due.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.due.is_empty()
    }
}
