use crate::promise::{normalize, IntoPromise, Promise};

pub(crate) mod array;
pub(crate) mod vec;

/// Wait for all promises to fulfill, or reject on the first rejection.
///
/// Aggregates multiple promises into a single promise which fulfills with
/// every value, in input order, once all of them have fulfilled.
pub trait JoinAll {
    /// The fulfillment value of the aggregate.
    type Output;

    /// The rejection reason of the aggregate.
    type Error;

    /// Waits for multiple promises to fulfill.
    ///
    /// The aggregate rejects as soon as any item rejects, with that item's
    /// reason. Items still pending at that point keep running, and their
    /// outcomes are discarded.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a runtime context.
    fn join_all(self) -> Promise<Self::Output, Self::Error>;
}

/// Wait for every item of `items` to fulfill.
///
/// `items` is drained once, in its iteration order, before this function
/// returns. See [`JoinAll`] for the full semantics.
///
/// # Examples
///
/// ```
/// use promise_concurrency::future::join_all;
/// use promise_concurrency::runtime::Runtime;
/// use std::collections::BTreeSet;
///
/// let rt = Runtime::new();
/// let _guard = rt.enter();
/// let set: BTreeSet<u8> = [3, 1, 2].into_iter().collect();
/// let res = rt.block_on(join_all(set.into_iter().map(Ok::<_, ()>)));
/// assert_eq!(res, Ok(vec![1, 2, 3]));
/// ```
pub fn join_all<I>(
    items: I,
) -> Promise<Vec<<I::Item as IntoPromise>::Value>, <I::Item as IntoPromise>::Error>
where
    I: IntoIterator,
    I::Item: IntoPromise,
{
    vec::join(normalize(items))
}
