use std::error::Error;
use std::fmt;

use crate::Elapsed;

/// The rejection reason of a [`deadline`] promise.
///
/// [`deadline`]: crate::future::deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineError<E> {
    /// The delay passed before the computation settled.
    Elapsed(Elapsed),
    /// The computation rejected in time, with this reason.
    Rejected(E),
}

impl<E> DeadlineError<E> {
    /// Returns `true` if the deadline passed.
    pub fn is_elapsed(&self) -> bool {
        matches!(self, DeadlineError::Elapsed(_))
    }

    /// The computation's own rejection reason, if it rejected in time.
    pub fn into_rejected(self) -> Option<E> {
        match self {
            DeadlineError::Rejected(reason) => Some(reason),
            DeadlineError::Elapsed(_) => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for DeadlineError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineError::Elapsed(elapsed) => fmt::Display::fmt(elapsed, f),
            DeadlineError::Rejected(reason) => fmt::Display::fmt(reason, f),
        }
    }
}

impl<E: Error + 'static> Error for DeadlineError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DeadlineError::Elapsed(_) => None,
            DeadlineError::Rejected(reason) => reason.source(),
        }
    }
}
