//! One-shot asynchronous values.
//!
//! A [`Promise`] is the read side of a single settlement: it ends up either
//! fulfilled with a value or rejected with a reason, exactly once. The write
//! side is a [`Resolver`], created together with its promise by [`channel`].
//!
//! A promise is observed either by `.await`ing it, or by registering a
//! continuation with [`Promise::on_settle`]. Continuations always run on the
//! runtime's immediate queue, never inline, even when the promise has already
//! settled by the time the continuation is registered.
//!
//! A [`Promise`] has a single owner which observes it once. To observe the
//! same outcome from any number of places, turn it into a [`Shared`] promise
//! with [`Promise::share`].

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use futures_core::future::FusedFuture;

use crate::runtime::Handle;

mod into_promise;
mod settled;
mod shared;

pub use into_promise::{IntoPromise, Item};
pub use settled::Settled;
pub use shared::Shared;

pub(crate) use into_promise::normalize;

type Continuation<T, E> = Box<dyn FnOnce(Result<T, E>)>;

enum Observer<T, E> {
    Idle,
    Waker(Waker),
    Continuation {
        handle: Handle,
        callback: Continuation<T, E>,
    },
}

enum State<T, E> {
    Pending(Observer<T, E>),
    Settled(Result<T, E>),
    /// The outcome has been handed to the observer.
    Observed,
}

impl<T, E> State<T, E> {
    fn name(&self) -> &'static str {
        match self {
            State::Pending(_) => "Pending",
            State::Settled(Ok(_)) => "Fulfilled",
            State::Settled(Err(_)) => "Rejected",
            State::Observed => "Observed",
        }
    }
}

/// Create a pending promise together with the resolver that settles it.
///
/// # Examples
///
/// ```
/// use promise_concurrency::promise;
/// use promise_concurrency::runtime::Runtime;
///
/// let (resolver, promise) = promise::channel::<u8, &str>();
/// assert!(resolver.fulfill(12));
/// assert!(!resolver.reject("too late"));
/// assert_eq!(Runtime::new().block_on(promise), Ok(12));
/// ```
pub fn channel<T, E>() -> (Resolver<T, E>, Promise<T, E>) {
    let state = Rc::new(RefCell::new(State::Pending(Observer::Idle)));
    (
        Resolver {
            state: state.clone(),
        },
        Promise { state },
    )
}

/// A one-shot asynchronous value which is either fulfilled or rejected.
///
/// Awaiting a promise yields `Ok(value)` on fulfillment and `Err(reason)` on
/// rejection.
#[must_use = "promises do nothing unless you `.await` them or register a continuation"]
pub struct Promise<T, E> {
    state: Rc<RefCell<State<T, E>>>,
}

impl<T, E> Promise<T, E> {
    /// A pending promise, together with the resolver that settles it.
    ///
    /// Equivalent to [`channel`].
    pub fn pending() -> (Resolver<T, E>, Self) {
        channel()
    }

    /// A promise which is already fulfilled with `value`.
    pub fn fulfilled(value: T) -> Self {
        Self::settled(Ok(value))
    }

    /// A promise which is already rejected with `reason`.
    pub fn rejected(reason: E) -> Self {
        Self::settled(Err(reason))
    }

    /// A promise which has already settled with `outcome`.
    pub fn settled(outcome: Result<T, E>) -> Self {
        Self {
            state: Rc::new(RefCell::new(State::Settled(outcome))),
        }
    }

    /// Returns `true` once the promise has reached a terminal state.
    pub fn is_settled(&self) -> bool {
        !matches!(*self.state.borrow(), State::Pending(_))
    }
}

impl<T: 'static, E: 'static> Promise<T, E> {
    /// Register a continuation which receives the outcome once the promise
    /// settles.
    ///
    /// The continuation is queued on the current runtime's immediate queue;
    /// it never runs inside this call.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a runtime context, or if the promise was
    /// already awaited to completion.
    pub fn on_settle<F>(self, callback: F)
    where
        F: FnOnce(Result<T, E>) + 'static,
    {
        let handle = Handle::current();
        let mut state = self.state.borrow_mut();
        match mem::replace(&mut *state, State::Observed) {
            State::Settled(outcome) => {
                drop(state);
                handle.defer(move || callback(outcome));
            }
            State::Pending(_) => {
                *state = State::Pending(Observer::Continuation {
                    handle,
                    callback: Box::new(callback),
                });
            }
            State::Observed => panic!("`Promise` observed after completing"),
        }
    }

    /// Turn this promise into one which can be cloned and observed any number
    /// of times.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a runtime context.
    pub fn share(self) -> Shared<T, E>
    where
        T: Clone,
        E: Clone,
    {
        Shared::new(self)
    }

    /// Map the fulfillment value, passing rejections through unchanged.
    pub fn map<U, F>(self, f: F) -> Promise<U, E>
    where
        F: FnOnce(T) -> U + 'static,
        U: 'static,
    {
        let (resolver, promise) = channel();
        self.on_settle(move |outcome| {
            resolver.settle(outcome.map(f));
        });
        promise
    }

    /// Map the rejection reason, passing fulfillments through unchanged.
    pub fn map_err<G, F>(self, f: F) -> Promise<T, G>
    where
        F: FnOnce(E) -> G + 'static,
        G: 'static,
    {
        let (resolver, promise) = channel();
        self.on_settle(move |outcome| {
            resolver.settle(outcome.map_err(f));
        });
        promise
    }
}

impl<T, E> Future for Promise<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match mem::replace(&mut *state, State::Observed) {
            State::Settled(outcome) => Poll::Ready(outcome),
            State::Pending(Observer::Waker(mut waker)) => {
                waker.clone_from(cx.waker());
                *state = State::Pending(Observer::Waker(waker));
                Poll::Pending
            }
            State::Pending(_) => {
                *state = State::Pending(Observer::Waker(cx.waker().clone()));
                Poll::Pending
            }
            State::Observed => panic!("`Promise` polled after completing"),
        }
    }
}

impl<T, E> FusedFuture for Promise<T, E> {
    fn is_terminated(&self) -> bool {
        matches!(*self.state.borrow(), State::Observed)
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Promise")
            .field(&self.state.borrow().name())
            .finish()
    }
}

/// The write side of a [`Promise`].
///
/// Dropping a resolver without settling leaves its promise pending forever.
pub struct Resolver<T, E> {
    state: Rc<RefCell<State<T, E>>>,
}

impl<T, E> Resolver<T, E> {
    /// Returns `true` once the promise has been settled.
    pub fn is_settled(&self) -> bool {
        !matches!(*self.state.borrow(), State::Pending(_))
    }
}

impl<T: 'static, E: 'static> Resolver<T, E> {
    /// Fulfill the promise with `value`.
    ///
    /// Returns `false`, dropping `value`, if the promise was already settled.
    pub fn fulfill(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Reject the promise with `reason`.
    ///
    /// Returns `false`, dropping `reason`, if the promise was already settled.
    pub fn reject(&self, reason: E) -> bool {
        self.settle(Err(reason))
    }

    /// Settle the promise with `outcome`.
    ///
    /// Returns `false`, dropping `outcome`, if the promise was already settled.
    pub fn settle(&self, outcome: Result<T, E>) -> bool {
        let mut state = self.state.borrow_mut();
        let observer = match &mut *state {
            State::Pending(observer) => mem::replace(observer, Observer::Idle),
            _ => return false,
        };

        match observer {
            Observer::Idle => *state = State::Settled(outcome),
            Observer::Waker(waker) => {
                *state = State::Settled(outcome);
                drop(state);
                waker.wake();
            }
            Observer::Continuation { handle, callback } => {
                *state = State::Observed;
                drop(state);
                handle.defer(move || callback(outcome));
            }
        }
        true
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Resolver")
            .field(&self.state.borrow().name())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::runtime::Runtime;
    use std::cell::Cell;

    #[test]
    fn smoke() {
        let rt = Runtime::new();
        let (resolver, promise) = channel::<&str, ()>();
        assert!(!promise.is_settled());
        assert!(resolver.fulfill("hello"));
        assert!(promise.is_settled());
        assert_eq!(rt.block_on(promise), Ok("hello"));
    }

    #[test]
    fn settles_at_most_once() {
        let rt = Runtime::new();
        let (resolver, promise) = channel::<u8, u8>();
        assert!(resolver.reject(1));
        assert!(!resolver.fulfill(2));
        assert!(!resolver.reject(3));
        assert_eq!(rt.block_on(promise), Err(1));
    }

    #[test]
    fn continuation_on_settled_promise_is_deferred() {
        let rt = Runtime::new();
        let _guard = rt.enter();
        let seen = Rc::new(Cell::new(None));

        let observer = seen.clone();
        Promise::<u8, ()>::fulfilled(7).on_settle(move |outcome| observer.set(Some(outcome)));
        assert_eq!(seen.get(), None);

        rt.block_on(futures_lite::future::yield_now());
        assert_eq!(seen.get(), Some(Ok(7)));
    }

    #[test]
    fn continuation_is_deferred_after_settle() {
        let rt = Runtime::new();
        let _guard = rt.enter();
        let seen = Rc::new(Cell::new(None));

        let (resolver, promise) = channel::<u8, u8>();
        let observer = seen.clone();
        promise.on_settle(move |outcome| observer.set(Some(outcome)));
        resolver.reject(4);
        assert_eq!(seen.get(), None);

        rt.block_on(futures_lite::future::yield_now());
        assert_eq!(seen.get(), Some(Err(4)));
    }

    #[test]
    fn map_and_map_err() {
        let rt = Runtime::new();
        rt.block_on(async {
            let doubled = Promise::<u8, ()>::fulfilled(21).map(|n| n * 2).await;
            assert_eq!(doubled, Ok(42));

            let reason = Promise::<(), u8>::rejected(1).map_err(|n| n + 1).await;
            assert_eq!(reason, Err(2));
        });
    }

    #[test]
    fn debug() {
        let (resolver, promise) = channel::<u8, u8>();
        assert_eq!(format!("{:?}", promise), "Promise(\"Pending\")");
        resolver.fulfill(1);
        assert_eq!(format!("{:?}", resolver), "Resolver(\"Fulfilled\")");
    }

    #[test]
    fn fused() {
        let rt = Runtime::new();
        let mut promise = Promise::<u8, ()>::fulfilled(1);
        assert!(!promise.is_terminated());
        assert_eq!(rt.block_on(&mut promise), Ok(1));
        assert!(promise.is_terminated());
    }
}
