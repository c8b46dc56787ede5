use std::future::Future;

use super::Promise;
use crate::runtime;

/// Conversion into a [`Promise`].
///
/// Every combinator in this crate accepts items implementing this trait, and
/// converts them all up front, in enumeration order, before registering any
/// continuation.
pub trait IntoPromise {
    /// The fulfillment value.
    type Value: 'static;
    /// The rejection reason.
    type Error: 'static;

    /// Convert `self` into a promise.
    ///
    /// Pending computations are spawned onto the current runtime, so this may
    /// panic when called outside of a runtime context.
    fn into_promise(self) -> Promise<Self::Value, Self::Error>;
}

/// Promises pass through unchanged.
impl<T: 'static, E: 'static> IntoPromise for Promise<T, E> {
    type Value = T;
    type Error = E;

    fn into_promise(self) -> Promise<T, E> {
        self
    }
}

/// An outcome which is already known becomes a settled promise.
impl<T: 'static, E: 'static> IntoPromise for Result<T, E> {
    type Value = T;
    type Error = E;

    fn into_promise(self) -> Promise<T, E> {
        Promise::settled(self)
    }
}

/// Either a plain value or a pending computation.
///
/// # Examples
///
/// ```
/// use promise_concurrency::prelude::*;
/// use promise_concurrency::runtime::Runtime;
/// use futures::future::{FutureExt, LocalBoxFuture};
///
/// let rt = Runtime::new();
/// let _guard = rt.enter();
/// let items: Vec<Item<&str, LocalBoxFuture<'static, Result<&str, ()>>>> = vec![
///     Item::Value("plain"),
///     Item::Pending(async { Ok("computed") }.boxed_local()),
/// ];
/// assert_eq!(rt.block_on(items.join_all()), Ok(vec!["plain", "computed"]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<T, F> {
    /// A plain value, which becomes an already-fulfilled promise.
    Value(T),
    /// A computation, which is spawned onto the current runtime.
    Pending(F),
}

impl<T, E, F> IntoPromise for Item<T, F>
where
    F: Future<Output = Result<T, E>> + 'static,
    T: 'static,
    E: 'static,
{
    type Value = T;
    type Error = E;

    fn into_promise(self) -> Promise<T, E> {
        match self {
            Item::Value(value) => Promise::fulfilled(value),
            Item::Pending(future) => runtime::spawn(future),
        }
    }
}

/// Drain `items` exactly once into a fixed sequence of promises.
pub(crate) fn normalize<I>(
    items: I,
) -> Vec<Promise<<I::Item as IntoPromise>::Value, <I::Item as IntoPromise>::Error>>
where
    I: IntoIterator,
    I::Item: IntoPromise,
{
    items.into_iter().map(IntoPromise::into_promise).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::runtime::Runtime;
    use std::cell::Cell;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    #[test]
    fn drains_the_source_once_in_order() {
        let rt = Runtime::new();
        let _guard = rt.enter();
        let pulls = Rc::new(Cell::new(0));

        let counter = pulls.clone();
        let mut n = 0;
        let source = std::iter::from_fn(move || {
            counter.set(counter.get() + 1);
            n += 1;
            (n <= 3).then(|| Ok::<_, ()>(n))
        });

        let promises = normalize(source);
        assert_eq!(promises.len(), 3);
        assert_eq!(pulls.get(), 4);
        assert!(promises.iter().all(Promise::is_settled));

        let values: Vec<_> = promises.into_iter().map(|p| rt.block_on(p)).collect();
        assert_eq!(values, vec![Ok(1), Ok(2), Ok(3)]);
    }

    #[test]
    fn sets_follow_their_iteration_order() {
        let rt = Runtime::new();
        let _guard = rt.enter();
        let set: BTreeSet<_> = [3, 1, 2].into_iter().collect();
        let promises = normalize(set.into_iter().map(Promise::<u8, ()>::fulfilled));
        let values: Vec<_> = promises.into_iter().map(|p| rt.block_on(p)).collect();
        assert_eq!(values, vec![Ok(1), Ok(2), Ok(3)]);
    }

    #[test]
    fn pending_items_are_spawned() {
        let rt = Runtime::new();
        let _guard = rt.enter();
        let item: Item<u8, _> = Item::Pending(async { Err::<u8, _>("nope") });
        let promise = item.into_promise();
        assert!(!promise.is_settled());
        assert_eq!(rt.block_on(promise), Err("nope"));
    }

    #[test]
    fn empty() {
        let promises = normalize(Vec::<Promise<(), ()>>::new());
        assert!(promises.is_empty());
    }
}
