use crate::promise::{normalize, IntoPromise, Promise};

pub(crate) mod array;
mod error;
pub(crate) mod vec;

pub use error::AggregateError;

/// Wait for the first promise to fulfill.
///
/// Aggregates multiple promises into a single promise which fulfills with the
/// first value produced, by completion order. It only rejects once every
/// item has rejected, with all of their reasons.
pub trait FirstFulfilled {
    /// The fulfillment value of the aggregate.
    type Output;

    /// The rejection reason of the aggregate.
    type Error;

    /// Waits for the first promise to fulfill.
    ///
    /// An empty input rejects immediately with an empty [`AggregateError`].
    ///
    /// # Panics
    ///
    /// Panics if called outside of a runtime context.
    fn first_fulfilled(self) -> Promise<Self::Output, Self::Error>;
}

/// Fulfill with the first item of `items` to fulfill.
///
/// # Examples
///
/// ```
/// use promise_concurrency::future::first_fulfilled;
/// use promise_concurrency::runtime::Runtime;
///
/// let rt = Runtime::new();
/// let _guard = rt.enter();
/// let res = rt.block_on(first_fulfilled(vec![Err("down"), Ok("mirror"), Ok("origin")]));
/// assert_eq!(res, Ok("mirror"));
///
/// let res = rt.block_on(first_fulfilled(vec![Err::<(), _>("a"), Err("b")]));
/// assert_eq!(res.unwrap_err().into_inner(), vec!["a", "b"]);
/// ```
pub fn first_fulfilled<I>(
    items: I,
) -> Promise<<I::Item as IntoPromise>::Value, AggregateError<<I::Item as IntoPromise>::Error>>
where
    I: IntoIterator,
    I::Item: IntoPromise,
{
    vec::race_ok(normalize(items))
}
