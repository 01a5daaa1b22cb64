//! Deadline timers owned by a view, and the declared retry schedule for late-settling content.
//!
//! There is no background thread: timers are deadlines, and the owner drains the due ones from
//! its event loop with the current instant. Dropping the queue cancels everything in it.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identifies a scheduled timer for cancellation.
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    deadline: Instant,
    task: T,
}

#[derive(Debug)]
/// Pending deadlines carrying a task payload.
pub struct Timers<T> {
    next_id: u64,
    pending: Vec<Timer<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> Timers<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to become due `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer {
            id,
            deadline: now + delay,
            task,
        });
        id
    }

    /// Cancels a timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.id != id);
        self.pending.len() != before
    }

    /// Cancels every timer whose task matches `pred`, returning how many were removed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|timer| !pred(&timer.task));
        before - self.pending.len()
    }

    /// Removes and returns every task due at `now`, earliest deadline first.
    ///
    /// Tasks sharing a deadline come out in the order they were scheduled.
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|timer| timer.deadline <= now);
        self.pending = rest;
        due.sort_by_key(|timer| (timer.deadline, timer.id));
        due.into_iter().map(|timer| timer.task).collect()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|timer| timer.deadline).min()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Re-check delays used after mount, for content whose layout settles late (images, fonts).
pub const DEFAULT_RETRY_DELAYS: [Duration; 4] = [
    Duration::from_millis(100),
    Duration::from_millis(500),
    Duration::from_millis(1000),
    Duration::from_millis(2000),
];

#[derive(Clone, Debug, PartialEq, Eq)]
/// A finite, explicit list of re-check delays measured from a single starting instant.
pub struct RetrySchedule {
    delays: Vec<Duration>,
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_DELAYS.to_vec())
    }
}

impl RetrySchedule {
    #[must_use]
    /// Builds a schedule; delays are sorted so the last one bounds the whole schedule.
    pub fn new(mut delays: Vec<Duration>) -> Self {
        delays.sort();
        delays.dedup();
        Self { delays }
    }

    #[must_use]
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    #[must_use]
    /// How long after arming the final re-check happens.
    pub fn horizon(&self) -> Duration {
        self.delays.last().copied().unwrap_or_default()
    }

    /// Schedules one copy of `task` per delay.
    pub fn arm<T: Clone>(&self, timers: &mut Timers<T>, now: Instant, task: &T) -> Vec<TimerId> {
        self.delays
            .iter()
            .map(|delay| timers.schedule(now, *delay, task.clone()))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/timers.rs"]
mod tests;
