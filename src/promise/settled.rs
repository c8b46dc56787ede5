/// The outcome of a single promise, as reported by [`join_all_settled`].
///
/// [`join_all_settled`]: crate::future::join_all_settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Settled<T, E> {
    /// The promise was fulfilled with a value.
    Fulfilled(T),
    /// The promise was rejected with a reason.
    Rejected(E),
}

impl<T, E> Settled<T, E> {
    /// Returns `true` if the promise was fulfilled.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settled::Fulfilled(_))
    }

    /// Returns `true` if the promise was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Settled::Rejected(_))
    }

    /// The fulfillment value, if any.
    pub fn value(self) -> Option<T> {
        match self {
            Settled::Fulfilled(value) => Some(value),
            Settled::Rejected(_) => None,
        }
    }

    /// The rejection reason, if any.
    pub fn reason(self) -> Option<E> {
        match self {
            Settled::Fulfilled(_) => None,
            Settled::Rejected(reason) => Some(reason),
        }
    }

    /// Converts from `&Settled<T, E>` to `Settled<&T, &E>`.
    pub fn as_ref(&self) -> Settled<&T, &E> {
        match self {
            Settled::Fulfilled(value) => Settled::Fulfilled(value),
            Settled::Rejected(reason) => Settled::Rejected(reason),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
    fn from(outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(value) => Settled::Fulfilled(value),
            Err(reason) => Settled::Rejected(reason),
        }
    }
}

impl<T, E> From<Settled<T, E>> for Result<T, E> {
    fn from(settled: Settled<T, E>) -> Self {
        match settled {
            Settled::Fulfilled(value) => Ok(value),
            Settled::Rejected(reason) => Err(reason),
        }
    }
}
