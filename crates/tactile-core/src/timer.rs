//! One-shot timers for recognizer deadlines.
//!
//! Recognizers never hold callbacks into themselves. Scheduling a timer hands
//! back a [`TimerToken`]; when the queue reports the token as due, the
//! dispatch root offers it to every recognizer and only the one whose
//! [`DeadlineTimer`] still holds that exact token reacts. Cancelling or
//! resetting simply forgets the token, so a late firing is a no-op.

use crate::collections::map::HashMap;
use std::collections::BTreeSet;

/// Identity of one scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Deadline-ordered queue of pending timers, in milliseconds.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: u64,
    next_token: u64,
    by_deadline: BTreeSet<(u64, TimerToken)>,
    deadlines: HashMap<TimerToken, u64>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest time the queue has been advanced to.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Moves the queue's notion of time forward. Time never goes backwards.
    pub fn set_now(&mut self, now: u64) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Schedules a timer at an absolute deadline.
    ///
    /// Deadlines in the past are clamped to the current time, so they fire on
    /// the next advance.
    pub fn schedule_at(&mut self, deadline: u64) -> TimerToken {
        let deadline = deadline.max(self.now);
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.by_deadline.insert((deadline, token));
        self.deadlines.insert(token, deadline);
        log::trace!("timer {} scheduled at {deadline}ms", token.0);
        token
    }

    /// Removes a pending timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        match self.deadlines.remove(&token) {
            Some(deadline) => {
                self.by_deadline.remove(&(deadline, token));
                log::trace!("timer {} cancelled", token.0);
                true
            }
            None => false,
        }
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.by_deadline.iter().next().map(|(deadline, _)| *deadline)
    }

    /// Pops the earliest timer due at or before `until`.
    ///
    /// The queue's clock is moved to the timer's deadline, so work performed
    /// while handling it observes the time at which it fired.
    pub fn pop_due(&mut self, until: u64) -> Option<TimerToken> {
        let (deadline, token) = *self.by_deadline.iter().next()?;
        if deadline > until {
            return None;
        }
        self.by_deadline.remove(&(deadline, token));
        self.deadlines.remove(&token);
        self.set_now(deadline);
        Some(token)
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

/// A recognizer-owned handle to at most one pending timer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeadlineTimer {
    token: Option<TimerToken>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer at `deadline`, replacing any previous arming.
    pub fn arm(&mut self, queue: &mut TimerQueue, deadline: u64) {
        self.cancel(queue);
        self.token = Some(queue.schedule_at(deadline));
    }

    /// Cancels the pending timer, removing it from the queue.
    pub fn cancel(&mut self, queue: &mut TimerQueue) {
        if let Some(token) = self.token.take() {
            queue.cancel(token);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.token.is_some()
    }

    /// Consumes `token` if it is the one this timer is waiting for.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.token == Some(token) {
            self.token = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[path = "tests/timer_tests.rs"]
mod tests;
