use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

use super::IntoDelay;
use crate::runtime::Handle;

/// Wait until `delay` has passed.
///
/// Inside a runtime context the delay starts when `sleep` is called, even if
/// the returned future is first polled later. Outside of one it starts at the
/// first poll.
///
/// # Examples
///
/// ```
/// use promise_concurrency::runtime::Runtime;
/// use promise_concurrency::time::sleep;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// Runtime::new().block_on(sleep(Duration::from_millis(10)));
/// assert!(start.elapsed() >= Duration::from_millis(10));
/// ```
pub fn sleep(delay: impl IntoDelay) -> Sleep {
    let delay = delay.into_delay();
    Sleep {
        delay,
        deadline: Handle::try_current().ok().map(|handle| handle.now() + delay),
        state: State::Idle,
    }
}

/// Waits until a delay has passed.
///
/// This `struct` is created by the [`sleep`] function. See its
/// documentation for more.
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Sleep {
    delay: Duration,
    deadline: Option<Instant>,
    state: State,
}

#[derive(Debug)]
enum State {
    Idle,
    Waiting(Rc<RefCell<Slot>>),
    Done,
}

/// Shared between a `Sleep` and its timer callback.
#[derive(Debug, Default)]
struct Slot {
    fired: bool,
    waker: Option<Waker>,
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        match &this.state {
            State::Idle => {
                let slot = Rc::new(RefCell::new(Slot {
                    fired: false,
                    waker: Some(cx.waker().clone()),
                }));
                let timer_slot = slot.clone();
                let handle = Handle::current();
                let deadline = *this.deadline.get_or_insert(handle.now() + this.delay);
                handle.schedule_at(deadline, move || {
                    let waker = {
                        let mut slot = timer_slot.borrow_mut();
                        slot.fired = true;
                        slot.waker.take()
                    };
                    if let Some(waker) = waker {
                        waker.wake();
                    }
                });
                this.state = State::Waiting(slot);
                Poll::Pending
            }
            State::Waiting(slot) => {
                let mut slot = slot.borrow_mut();
                if slot.fired {
                    drop(slot);
                    this.state = State::Done;
                    Poll::Ready(())
                } else {
                    match &mut slot.waker {
                        Some(waker) => waker.clone_from(cx.waker()),
                        None => slot.waker = Some(cx.waker().clone()),
                    }
                    Poll::Pending
                }
            }
            State::Done => panic!("`Sleep` polled after completing"),
        }
    }
}
