use std::cell::RefCell;
use std::fmt;
use std::future::IntoFuture;
use std::mem;
use std::rc::Rc;

use tracing::trace;

use super::{channel, IntoPromise, Promise, Resolver};

enum State<T, E> {
    Pending(Vec<Resolver<T, E>>),
    Settled(Result<T, E>),
}

/// A cloneable promise with any number of observers.
///
/// Created by [`Promise::share`]. Every observer gets its own clone of the
/// outcome, and observers registered after settlement still receive it.
///
/// # Examples
///
/// ```
/// use promise_concurrency::prelude::*;
/// use promise_concurrency::runtime::{spawn, Runtime};
/// use promise_concurrency::time::sleep;
///
/// let rt = Runtime::builder().start_paused(true).build();
/// rt.block_on(async {
///     let fetch = spawn(async {
///         sleep(100i64).await;
///         Ok::<_, ()>("payload")
///     })
///     .share();
///
///     // The same computation, both joined and bounded by a deadline.
///     let bounded = fetch.clone().deadline(300i64);
///     let joined = vec![fetch.clone(), Promise::fulfilled("local").share()].join_all();
///     assert_eq!(bounded.await, Ok("payload"));
///     assert_eq!(joined.await, Ok(vec!["payload", "local"]));
///     assert_eq!(fetch.await, Ok("payload"));
/// });
/// ```
pub struct Shared<T, E> {
    state: Rc<RefCell<State<T, E>>>,
}

impl<T, E> Shared<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub(super) fn new(source: Promise<T, E>) -> Self {
        let state = Rc::new(RefCell::new(State::Pending(Vec::new())));
        let target = state.clone();
        source.on_settle(move |outcome: Result<T, E>| {
            let observers = match mem::replace(&mut *target.borrow_mut(), State::Settled(outcome.clone())) {
                State::Pending(observers) => observers,
                State::Settled(_) => unreachable!("a shared promise settles once"),
            };
            trace!(observers = observers.len(), "shared promise settled");
            for observer in observers {
                observer.settle(outcome.clone());
            }
        });
        Self { state }
    }

    /// A new promise observing the same outcome.
    ///
    /// The returned promise is already settled if this one is.
    pub fn promise(&self) -> Promise<T, E> {
        let mut state = self.state.borrow_mut();
        match &mut *state {
            State::Settled(outcome) => Promise::settled(outcome.clone()),
            State::Pending(observers) => {
                let (resolver, promise) = channel();
                observers.push(resolver);
                promise
            }
        }
    }

    /// Register a continuation which receives a clone of the outcome.
    ///
    /// Any number of continuations may be registered; each one runs on the
    /// immediate queue, in registration order.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a runtime context.
    pub fn on_settle<F>(&self, callback: F)
    where
        F: FnOnce(Result<T, E>) + 'static,
    {
        self.promise().on_settle(callback);
    }

    /// Returns `true` once the outcome is known.
    pub fn is_settled(&self) -> bool {
        matches!(*self.state.borrow(), State::Settled(_))
    }
}

impl<T, E> Clone for Shared<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T, E> IntoPromise for Shared<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    type Value = T;
    type Error = E;

    fn into_promise(self) -> Promise<T, E> {
        self.promise()
    }
}

impl<T, E> IntoFuture for Shared<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    type Output = Result<T, E>;
    type IntoFuture = Promise<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        self.promise()
    }
}

impl<T, E> fmt::Debug for Shared<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.borrow() {
            State::Pending(observers) => format!("Pending({})", observers.len()),
            State::Settled(Ok(_)) => "Fulfilled".to_string(),
            State::Settled(Err(_)) => "Rejected".to_string(),
        };
        f.debug_tuple("Shared").field(&state).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::runtime::Runtime;
    use crate::utils::testing::{delayed, paused};
    use std::cell::Cell;

    #[test]
    fn two_continuations_on_one_promise() {
        let rt = paused();
        let seen = Rc::new(RefCell::new(Vec::new()));
        rt.block_on(async {
            let shared = delayed::<_, ()>(10, Ok(5)).share();
            for tag in ["first", "second"] {
                let seen = seen.clone();
                shared.on_settle(move |outcome| seen.borrow_mut().push((tag, outcome)));
            }
            assert_eq!(shared.clone().await, Ok(5));
        });
        assert_eq!(
            *seen.borrow(),
            vec![("first", Ok(5)), ("second", Ok(5))]
        );
    }

    #[test]
    fn observers_after_settlement() {
        let rt = Runtime::new();
        rt.block_on(async {
            let shared = Promise::<u8, &str>::rejected("nope").share();
            assert_eq!(shared.clone().await, Err("nope"));
            assert!(shared.is_settled());

            let promise = shared.promise();
            assert!(promise.is_settled());
            assert_eq!(promise.await, Err("nope"));
        });
    }

    #[test]
    fn continuations_are_deferred() {
        let rt = Runtime::new();
        let _guard = rt.enter();
        let ran = Rc::new(Cell::new(0));
        let shared = Promise::<u8, ()>::fulfilled(1).share();

        let counter = ran.clone();
        shared.on_settle(move |_| counter.set(counter.get() + 1));
        assert_eq!(ran.get(), 0);

        rt.block_on(futures_lite::future::yield_now());
        rt.block_on(futures_lite::future::yield_now());
        assert_eq!(ran.get(), 1);
    }

    #[test]
    fn debug() {
        let rt = Runtime::new();
        let _guard = rt.enter();
        let (resolver, promise) = channel::<u8, ()>();
        let shared = promise.share();
        let _observer = shared.promise();
        assert_eq!(format!("{:?}", shared), "Shared(\"Pending(1)\")");
        resolver.fulfill(3);
        rt.block_on(futures_lite::future::yield_now());
        assert_eq!(format!("{:?}", shared), "Shared(\"Fulfilled\")");
    }
}
