use crate::future::first_settled;
use crate::promise::{IntoPromise, Promise};
use crate::runtime;
use crate::time::{reject_after, IntoDelay};

mod error;

pub use error::DeadlineError;

/// Bound the time spent waiting on a computation.
///
/// This trait is implemented for everything which converts into a
/// [`Promise`].
pub trait Deadline: IntoPromise + Sized {
    /// Settle with the outcome of `self` if it settles within `delay`, and
    /// reject with [`DeadlineError::Elapsed`] otherwise.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a runtime context.
    fn deadline(self, delay: impl IntoDelay) -> Promise<Self::Value, DeadlineError<Self::Error>> {
        deadline(self, delay)
    }
}

impl<P: IntoPromise> Deadline for P {}

/// Race `computation` against a timer which rejects after `delay`.
///
/// The computation is not cancelled when the timer wins: it keeps running
/// and its outcome is discarded. `delay` is measured from this call, but the
/// timer only ever fires on a timer turn, so a zero or negative delay still
/// lets a computation which has already settled win.
///
/// # Examples
///
/// ```
/// use promise_concurrency::future::{deadline, DeadlineError};
/// use promise_concurrency::runtime::{spawn, Runtime};
/// use promise_concurrency::time::sleep;
///
/// let rt = Runtime::builder().start_paused(true).build();
/// let res = rt.block_on(async {
///     let never = spawn(std::future::pending::<Result<(), ()>>());
///     deadline(never, 200i64).await
/// });
/// assert!(matches!(res, Err(DeadlineError::Elapsed(_))));
///
/// let res = rt.block_on(async {
///     let quick = spawn(async {
///         sleep(100i64).await;
///         Ok::<_, ()>("done")
///     });
///     deadline(quick, 300i64).await
/// });
/// assert_eq!(res, Ok("done"));
/// ```
pub fn deadline<P>(
    computation: P,
    delay: impl IntoDelay,
) -> Promise<P::Value, DeadlineError<P::Error>>
where
    P: IntoPromise,
{
    let computation = computation.into_promise().map_err(DeadlineError::Rejected);
    let timer = runtime::spawn(reject_after::<P::Value>(delay)).map_err(DeadlineError::Elapsed);
    first_settled([computation, timer])
}
