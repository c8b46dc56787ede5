use std::cell::Cell;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::time::{Duration, Instant};

/// An opaque handle to a scheduled timer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// The time source of a runtime.
#[derive(Debug)]
pub(crate) enum Clock {
    /// Wall-clock time; the run loop parks until the next deadline.
    Real,
    /// Virtual time which only moves when the run loop jumps to the next
    /// timer deadline.
    Paused {
        base: Instant,
        elapsed: Cell<Duration>,
    },
}

impl Clock {
    pub(crate) fn paused() -> Self {
        Clock::Paused {
            base: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
        }
    }

    pub(crate) fn now(&self) -> Instant {
        match self {
            Clock::Real => Instant::now(),
            Clock::Paused { base, elapsed } => *base + elapsed.get(),
        }
    }

    pub(crate) fn is_paused(&self) -> bool {
        matches!(self, Clock::Paused { .. })
    }

    /// Move virtual time forward to `deadline`. Never moves backwards, and is
    /// a no-op for the real clock.
    pub(crate) fn advance_to(&self, deadline: Instant) {
        if let Clock::Paused { base, elapsed } = self {
            let target = deadline.saturating_duration_since(*base);
            if target > elapsed.get() {
                elapsed.set(target);
            }
        }
    }
}

pub(crate) struct TimerEntry {
    pub(crate) deadline: Instant,
    pub(crate) id: TimerId,
    pub(crate) callback: Box<dyn FnOnce()>,
}

impl fmt::Debug for TimerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEntry")
            .field("deadline", &self.deadline)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// Entries are ordered by deadline, then by registration order.
impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.id).cmp(&(other.deadline, other.id))
    }
}

/// Timer callbacks, fired earliest deadline first.
#[derive(Debug, Default)]
pub(crate) struct TimerQueue {
    entries: BinaryHeap<Reverse<TimerEntry>>,
    next_id: u64,
}

impl TimerQueue {
    pub(crate) fn insert(&mut self, deadline: Instant, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Reverse(TimerEntry {
            deadline,
            id,
            callback,
        }));
        id
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.entries.peek().map(|Reverse(entry)| entry.deadline)
    }

    /// Remove the earliest entry if its deadline is at or before `now`.
    pub(crate) fn pop_due(&mut self, now: Instant) -> Option<TimerEntry> {
        match self.entries.peek() {
            Some(Reverse(entry)) if entry.deadline <= now => {
                self.entries.pop().map(|Reverse(entry)| entry)
            }
            _ => None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
