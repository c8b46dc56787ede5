//! Timer-driven futures.
//!
//! [`sleep`] completes after a delay and [`reject_after`] rejects with
//! [`Elapsed`] after a delay. Both start counting when they are created
//! within a runtime context, and both are clamped to the next timer turn for
//! a zero delay: they never complete within the turn which first polled them.
//!
//! [`Elapsed`]: crate::Elapsed

use std::time::Duration;

mod reject_after;
mod sleep;

pub use reject_after::{reject_after, RejectAfter};
pub use sleep::{sleep, Sleep};

/// Conversion into a timer delay.
///
/// Delays are either a [`Duration`] or a signed number of milliseconds, where
/// zero and negative values both mean "as soon as possible".
pub trait IntoDelay {
    /// Convert `self` into a non-negative delay.
    fn into_delay(self) -> Duration;
}

impl IntoDelay for Duration {
    fn into_delay(self) -> Duration {
        self
    }
}

impl IntoDelay for i64 {
    fn into_delay(self) -> Duration {
        u64::try_from(self).map_or(Duration::ZERO, Duration::from_millis)
    }
}
