use std::convert::Infallible;

use crate::promise::{normalize, IntoPromise, Promise, Settled};

pub(crate) mod array;
pub(crate) mod vec;

/// Wait for all promises to settle, whatever their outcome.
///
/// Aggregates multiple promises into a single promise which fulfills with one
/// [`Settled`] record per item, in input order, once the last of them has
/// settled. The aggregate never rejects.
pub trait JoinAllSettled {
    /// The fulfillment value of the aggregate.
    type Output;

    /// Waits for multiple promises to settle.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a runtime context.
    fn join_all_settled(self) -> Promise<Self::Output, Infallible>;
}

/// Wait for every item of `items` to settle.
///
/// # Examples
///
/// ```
/// use promise_concurrency::future::join_all_settled;
/// use promise_concurrency::promise::Settled;
/// use promise_concurrency::runtime::Runtime;
///
/// let rt = Runtime::new();
/// let _guard = rt.enter();
/// let records = rt.block_on(join_all_settled(vec![Ok(1), Err("nope")]));
/// assert_eq!(records, Ok(vec![Settled::Fulfilled(1), Settled::Rejected("nope")]));
/// ```
pub fn join_all_settled<I>(
    items: I,
) -> Promise<Vec<Settled<<I::Item as IntoPromise>::Value, <I::Item as IntoPromise>::Error>>, Infallible>
where
    I: IntoIterator,
    I::Item: IntoPromise,
{
    vec::join_settled(normalize(items))
}
