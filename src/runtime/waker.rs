use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::Wake;
use std::thread::{self, Thread};
use std::time::Duration;

use fixedbitset::FixedBitSet;

/// The id used for the future passed to `block_on`, which does not live in
/// the task slab.
pub(crate) const MAIN_TASK: usize = usize::MAX;

/// Tracks which tasks have been woken since the run loop last looked.
#[derive(Debug)]
struct Readiness {
    main_ready: bool,
    woken: Vec<usize>,
    queued: FixedBitSet,
}

impl Readiness {
    /// Mark a task as woken.
    ///
    /// Returns the old ready state for this id.
    fn set_ready(&mut self, id: usize) -> bool {
        let was_ready = if id == MAIN_TASK {
            mem::replace(&mut self.main_ready, true)
        } else {
            if id >= self.queued.len() {
                self.queued.grow(id + 1);
            }
            self.queued.put(id)
        };
        if !was_ready {
            self.woken.push(id);
        }
        was_ready
    }

    fn clear_ready(&mut self, id: usize) {
        if id == MAIN_TASK {
            self.main_ready = false;
        } else {
            self.queued.set(id, false);
        }
    }
}

/// Wake bookkeeping shared between the run loop and every task waker.
///
/// Wakers may be sent to other threads, so this is the only part of the
/// runtime guarded by a lock. Waking also unparks the runtime thread.
#[derive(Debug)]
pub(crate) struct Notifier {
    readiness: Mutex<Readiness>,
    thread: Thread,
}

impl Notifier {
    /// Create a notifier bound to the current thread.
    pub(crate) fn new() -> Self {
        Self {
            readiness: Mutex::new(Readiness {
                main_ready: false,
                woken: Vec::new(),
                queued: FixedBitSet::new(),
            }),
            thread: thread::current(),
        }
    }

    fn readiness(&self) -> MutexGuard<'_, Readiness> {
        self.readiness
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_ready(&self, id: usize) {
        let was_ready = self.readiness().set_ready(id);
        if !was_ready {
            self.thread.unpark();
        }
    }

    /// Hand every woken task id to `f` in wake order and clear them.
    pub(crate) fn drain(&self, mut f: impl FnMut(usize)) {
        let woken = {
            let mut readiness = self.readiness();
            let woken = mem::take(&mut readiness.woken);
            for &id in &woken {
                readiness.clear_ready(id);
            }
            woken
        };
        woken.into_iter().for_each(&mut f);
    }

    pub(crate) fn any_ready(&self) -> bool {
        !self.readiness().woken.is_empty()
    }

    /// Block the runtime thread until something is woken.
    pub(crate) fn park(&self) {
        if !self.any_ready() {
            thread::park();
        }
    }

    /// Block the runtime thread until something is woken or `timeout` passes.
    pub(crate) fn park_timeout(&self, timeout: Duration) {
        if !self.any_ready() {
            thread::park_timeout(timeout);
        }
    }
}

/// A waker which reports its task id to the [`Notifier`].
#[derive(Debug, Clone)]
pub(crate) struct TaskWaker {
    id: usize,
    notifier: Arc<Notifier>,
}

impl TaskWaker {
    pub(crate) fn new(id: usize, notifier: Arc<Notifier>) -> Self {
        Self { id, notifier }
    }
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.notifier.set_ready(self.id);
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.notifier.set_ready(self.id);
    }
}
