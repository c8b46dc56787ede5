use core::future::Future;
use core::marker::PhantomData;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use pin_project::pin_project;

use super::{sleep, IntoDelay, Sleep};
use crate::Elapsed;

/// Reject with [`Elapsed`] once `delay` has passed.
///
/// The delay starts as for [`sleep`]: at this call inside a runtime context.
/// `T` is the type the future would have fulfilled with, which lets it race
/// against other computations producing `T`.
///
/// # Examples
///
/// ```
/// use promise_concurrency::runtime::Runtime;
/// use promise_concurrency::time::reject_after;
///
/// let rt = Runtime::builder().start_paused(true).build();
/// let res = rt.block_on(reject_after::<()>(300i64));
/// assert!(res.is_err());
/// ```
pub fn reject_after<T>(delay: impl IntoDelay) -> RejectAfter<T> {
    RejectAfter {
        sleep: sleep(delay),
        _marker: PhantomData,
    }
}

/// Rejects once a delay has passed.
///
/// This `struct` is created by the [`reject_after`] function. See its
/// documentation for more.
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct RejectAfter<T> {
    #[pin]
    sleep: Sleep,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Future for RejectAfter<T> {
    type Output = Result<T, Elapsed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        ready!(this.sleep.poll(cx));
        Poll::Ready(Err(Elapsed::new()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::runtime::{now, Runtime};
    use std::time::Duration;

    #[test]
    fn rejects_after_the_delay() {
        let rt = Runtime::builder().start_paused(true).build();
        rt.block_on(async {
            let start = now();
            let res = reject_after::<u8>(Duration::from_millis(300)).await;
            assert_eq!(res, Err(Elapsed::new()));
            assert_eq!(now() - start, Duration::from_millis(300));
        });
    }

    #[test]
    fn negative_delay_rejects_on_the_next_timer_turn() {
        let rt = Runtime::builder().start_paused(true).build();
        rt.block_on(async {
            let start = now();
            assert!(reject_after::<u8>(-100i64).await.is_err());
            assert_eq!(now(), start);
        });
    }
}
