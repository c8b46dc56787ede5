use std::error::Error;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// The rejection reasons of every item, in input order.
///
/// Returned by [`first_fulfilled`] when no item fulfilled.
///
/// [`first_fulfilled`]: crate::future::first_fulfilled
#[derive(Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct AggregateError<E> {
    inner: Vec<E>,
}

impl<E> AggregateError<E> {
    pub(crate) fn new(inner: Vec<E>) -> Self {
        Self { inner }
    }

    /// Consume the error, returning the individual reasons.
    pub fn into_inner(self) -> Vec<E> {
        self.inner
    }
}

impl<E: fmt::Debug> fmt::Debug for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AggregateError").field(&self.inner).finish()
    }
}

impl<E: fmt::Display> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} promises rejected", self.inner.len())?;
        for (i, err) in self.inner.iter().enumerate() {
            write!(f, "\n- Reason {}: {err}", i + 1)?;
        }
        Ok(())
    }
}

impl<E> Deref for AggregateError<E> {
    type Target = Vec<E>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<E> DerefMut for AggregateError<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<E: Error> Error for AggregateError<E> {}
