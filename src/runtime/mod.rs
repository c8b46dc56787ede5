//! A single-threaded runtime with an immediate queue and a timer queue.
//!
//! Every promise continuation and every task poll goes through the immediate
//! queue, in FIFO order. Timers fire only once the immediate queue is empty,
//! one at a time and earliest deadline first, with ties broken by registration
//! order. A timer with a zero delay therefore never fires within the turn that
//! scheduled it.
//!
//! Nothing spawned on the runtime is ever cancelled: a task runs until it
//! completes, or until the [`Runtime`] itself is dropped.
//!
//! # Examples
//!
//! ```
//! use promise_concurrency::prelude::*;
//! use promise_concurrency::runtime::{spawn, Runtime};
//! use promise_concurrency::time::sleep;
//! use std::time::Duration;
//!
//! let rt = Runtime::builder().start_paused(true).build();
//! let values = rt.block_on(async {
//!     let slow = spawn(async {
//!         sleep(Duration::from_millis(50)).await;
//!         Ok::<_, ()>("slow")
//!     });
//!     vec![slow, Promise::fulfilled("fast")].join_all().await
//! });
//! assert_eq!(values, Ok(vec!["slow", "fast"]));
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::Instant;

use slab::Slab;
use tracing::{debug, trace};

use crate::promise::{self, Promise};
use crate::time::IntoDelay;
use crate::Error;

mod builder;
mod context;
mod timer;
mod waker;

pub use builder::Builder;
pub use context::EnterGuard;
pub use timer::TimerId;

use timer::{Clock, TimerQueue};
use waker::{Notifier, TaskWaker, MAIN_TASK};

type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// A unit of work in the immediate queue.
enum Job {
    /// Poll the task stored under this slab key.
    Poll(usize),
    /// Run a deferred callback, such as a promise continuation.
    Run(Box<dyn FnOnce()>),
}

struct Inner {
    clock: Clock,
    queue: RefCell<VecDeque<Job>>,
    tasks: RefCell<Slab<Option<LocalTask>>>,
    timers: RefCell<TimerQueue>,
    notifier: Arc<Notifier>,
}

/// The outcome of a timer turn.
enum TimerTurn {
    /// A timer callback ran.
    Fired,
    /// The run loop waited for the next deadline, or for a wake-up.
    Waited,
    /// There are no timers.
    Empty,
}

/// A single-threaded executor for promises and timers.
///
/// A `Runtime` is bound to the thread that created it.
pub struct Runtime {
    handle: Handle,
}

impl Runtime {
    /// Create a runtime with the default configuration.
    pub fn new() -> Self {
        Builder::new().build()
    }

    /// Create a [`Builder`] to configure a runtime.
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn with_clock(clock: Clock) -> Self {
        debug!(paused = clock.is_paused(), "creating runtime");
        Self {
            handle: Handle {
                inner: Rc::new(Inner {
                    clock,
                    queue: RefCell::new(VecDeque::new()),
                    tasks: RefCell::new(Slab::new()),
                    timers: RefCell::new(TimerQueue::default()),
                    notifier: Arc::new(Notifier::new()),
                }),
            },
        }
    }

    /// A handle to this runtime.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Make this the current runtime until the guard is dropped.
    ///
    /// This allows promises, timers and combinators to be created outside of
    /// [`block_on`](Self::block_on).
    pub fn enter(&self) -> EnterGuard {
        context::enter(self.handle.clone())
    }

    /// Spawn a computation onto this runtime. See [`Handle::spawn`].
    pub fn spawn<F, T, E>(&self, future: F) -> Promise<T, E>
    where
        F: Future<Output = Result<T, E>> + 'static,
        T: 'static,
        E: 'static,
    {
        self.handle.spawn(future)
    }

    /// Drive the runtime until `future` completes, and return its output.
    ///
    /// When there is no queued work and no pending timer, the thread parks
    /// until a waker is invoked from elsewhere. A future which can never
    /// complete therefore blocks forever; use [`try_block_on`] to detect that.
    ///
    /// [`try_block_on`]: Self::try_block_on
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        match self.drive(future, true) {
            Ok(output) => output,
            Err(_) => unreachable!("a parking run loop never stalls"),
        }
    }

    /// Drive the runtime until `future` completes, or until nothing is left
    /// that could make it complete.
    ///
    /// Returns [`Error::Stalled`] when the immediate queue and the timer queue
    /// are both empty while `future` is still pending.
    pub fn try_block_on<F: Future>(&self, future: F) -> Result<F::Output, Error> {
        self.drive(future, false)
    }

    fn drive<F: Future>(&self, future: F, park_when_idle: bool) -> Result<F::Output, Error> {
        let _enter = self.enter();
        let inner = &self.handle.inner;

        futures_lite::pin!(future);
        let waker = Waker::from(Arc::new(TaskWaker::new(MAIN_TASK, inner.notifier.clone())));
        let mut cx = Context::from_waker(&waker);
        inner.notifier.set_ready(MAIN_TASK);

        loop {
            match self.handle.next_job() {
                Some(Job::Poll(MAIN_TASK)) => {
                    if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                        return Ok(output);
                    }
                    continue;
                }
                Some(job) => {
                    self.handle.run_job(job);
                    continue;
                }
                None => {}
            }

            match self.handle.fire_next_timer() {
                TimerTurn::Fired | TimerTurn::Waited => continue,
                TimerTurn::Empty => {}
            }

            if park_when_idle {
                inner.notifier.park();
            } else if !inner.notifier.any_ready() {
                debug!("runtime stalled");
                return Err(Error::Stalled);
            }
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("handle", &self.handle)
            .finish()
    }
}

/// Tasks and continuations may hold handles to the runtime, so the queues are
/// emptied explicitly to release them.
impl Drop for Runtime {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

/// A cloneable reference to a [`Runtime`].
#[derive(Clone)]
pub struct Handle {
    inner: Rc<Inner>,
}

impl Handle {
    /// The handle of the runtime driving the current thread.
    ///
    /// # Panics
    ///
    /// Panics if called outside of [`Runtime::block_on`] or
    /// [`Runtime::enter`].
    pub fn current() -> Self {
        match Self::try_current() {
            Ok(handle) => handle,
            Err(err) => panic!("{err}"),
        }
    }

    /// The handle of the runtime driving the current thread, if any.
    pub fn try_current() -> Result<Self, Error> {
        context::current().ok_or(Error::NoRuntime)
    }

    /// The current time according to the runtime's clock.
    pub fn now(&self) -> Instant {
        self.inner.clock.now()
    }

    /// Spawn a computation.
    ///
    /// The computation starts running on a later turn of the immediate queue
    /// and is driven to completion whether or not anyone observes the
    /// returned promise.
    pub fn spawn<F, T, E>(&self, future: F) -> Promise<T, E>
    where
        F: Future<Output = Result<T, E>> + 'static,
        T: 'static,
        E: 'static,
    {
        let (resolver, promise) = promise::channel();
        let key = self.spawn_task(Box::pin(async move {
            resolver.settle(future.await);
        }));
        trace!(task = key, "spawned task");
        promise
    }

    /// Run `callback` once `delay` has passed.
    ///
    /// The callback never runs within the current turn, even for a zero
    /// delay.
    pub fn schedule<D, F>(&self, delay: D, callback: F) -> TimerId
    where
        D: IntoDelay,
        F: FnOnce() + 'static,
    {
        self.schedule_at(self.now() + delay.into_delay(), callback)
    }

    /// Run `callback` once the clock reaches `deadline`.
    ///
    /// A deadline in the past fires on the next timer turn.
    pub(crate) fn schedule_at<F>(&self, deadline: Instant, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let id = self
            .inner
            .timers
            .borrow_mut()
            .insert(deadline, Box::new(callback));
        trace!(timer = ?id, "scheduled timer");
        id
    }

    /// Push a callback onto the back of the immediate queue.
    pub(crate) fn defer(&self, callback: impl FnOnce() + 'static) {
        self.inner
            .queue
            .borrow_mut()
            .push_back(Job::Run(Box::new(callback)));
    }

    fn spawn_task(&self, task: LocalTask) -> usize {
        let key = self.inner.tasks.borrow_mut().insert(Some(task));
        self.inner.queue.borrow_mut().push_back(Job::Poll(key));
        key
    }

    /// Pop the next job, after queueing every task woken since the last one.
    fn next_job(&self) -> Option<Job> {
        let mut queue = self.inner.queue.borrow_mut();
        self.inner
            .notifier
            .drain(|key| queue.push_back(Job::Poll(key)));
        queue.pop_front()
    }

    fn run_job(&self, job: Job) {
        match job {
            Job::Run(callback) => callback(),
            Job::Poll(key) => self.poll_task(key),
        }
    }

    fn poll_task(&self, key: usize) {
        // Take the task out of its slot so it can spawn while being polled.
        let task = self.inner.tasks.borrow_mut().get_mut(key).and_then(Option::take);
        let Some(mut task) = task else {
            trace!(task = key, "ignoring wake-up for a finished task");
            return;
        };

        let waker = Waker::from(Arc::new(TaskWaker::new(key, self.inner.notifier.clone())));
        let mut cx = Context::from_waker(&waker);
        trace!(task = key, "polling task");

        match task.as_mut().poll(&mut cx) {
            Poll::Ready(()) => {
                self.inner.tasks.borrow_mut().try_remove(key);
                trace!(task = key, "task completed");
            }
            Poll::Pending => {
                if let Some(slot) = self.inner.tasks.borrow_mut().get_mut(key) {
                    *slot = Some(task);
                }
            }
        }
    }

    fn fire_next_timer(&self) -> TimerTurn {
        let Some(deadline) = self.inner.timers.borrow().next_deadline() else {
            return TimerTurn::Empty;
        };

        let now = self.now();
        if deadline > now {
            if self.inner.clock.is_paused() {
                self.inner.clock.advance_to(deadline);
            } else {
                self.inner.notifier.park_timeout(deadline - now);
                return TimerTurn::Waited;
            }
        }

        let entry = self.inner.timers.borrow_mut().pop_due(self.now());
        match entry {
            Some(entry) => {
                trace!(timer = ?entry.id, "firing timer");
                (entry.callback)();
                TimerTurn::Fired
            }
            None => TimerTurn::Waited,
        }
    }

    fn shutdown(&self) {
        let tasks = std::mem::take(&mut *self.inner.tasks.borrow_mut());
        let queue = std::mem::take(&mut *self.inner.queue.borrow_mut());
        let timers = std::mem::take(&mut *self.inner.timers.borrow_mut());
        debug!(
            tasks = tasks.len(),
            jobs = queue.len(),
            timers = timers.len(),
            "shutting down runtime"
        );
        // Dropping these may run destructors which touch the runtime again,
        // so no borrow is held here.
        drop(tasks);
        drop(queue);
        drop(timers);
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("clock", &self.inner.clock)
            .field("tasks", &self.inner.tasks.borrow().len())
            .field("jobs", &self.inner.queue.borrow().len())
            .field("timers", &self.inner.timers.borrow().len())
            .finish()
    }
}

/// Spawn a computation onto the current runtime.
///
/// # Panics
///
/// Panics if called outside of a runtime context.
pub fn spawn<F, T, E>(future: F) -> Promise<T, E>
where
    F: Future<Output = Result<T, E>> + 'static,
    T: 'static,
    E: 'static,
{
    Handle::current().spawn(future)
}

/// The current time according to the current runtime's clock.
///
/// # Panics
///
/// Panics if called outside of a runtime context.
pub fn now() -> Instant {
    Handle::current().now()
}
