use crate::promise::{normalize, IntoPromise, Promise};

pub(crate) mod array;
pub(crate) mod vec;

/// Wait for the first promise to settle.
///
/// Aggregates multiple promises into a single promise which adopts the
/// outcome of whichever item settles first in time, fulfilled or rejected.
pub trait FirstSettled {
    /// The fulfillment value of the aggregate.
    type Output;

    /// The rejection reason of the aggregate.
    type Error;

    /// Waits for the first promise to settle.
    ///
    /// Outcomes of the items which settle later are discarded; those items
    /// keep running. An empty input yields a promise which stays pending
    /// forever.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a runtime context.
    fn first_settled(self) -> Promise<Self::Output, Self::Error>;
}

/// Adopt the outcome of the first item of `items` to settle.
///
/// # Examples
///
/// ```
/// use promise_concurrency::future::first_settled;
/// use promise_concurrency::runtime::{spawn, Runtime};
/// use promise_concurrency::time::sleep;
///
/// let rt = Runtime::builder().start_paused(true).build();
/// let winner = rt.block_on(async {
///     let one = spawn(async {
///         sleep(100i64).await;
///         Ok::<_, ()>("Value 1")
///     });
///     let two = spawn(async {
///         sleep(200i64).await;
///         Ok("Value 2")
///     });
///     first_settled([one, two]).await
/// });
/// assert_eq!(winner, Ok("Value 1"));
/// ```
pub fn first_settled<I>(
    items: I,
) -> Promise<<I::Item as IntoPromise>::Value, <I::Item as IntoPromise>::Error>
where
    I: IntoIterator,
    I::Item: IntoPromise,
{
    vec::race(normalize(items))
}
