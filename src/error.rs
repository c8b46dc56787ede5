use thiserror::Error;

/// Errors produced by the runtime itself, as opposed to rejections carried by
/// promises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A runtime-bound operation was invoked outside of a runtime context.
    #[error("must be called from the context of a promise-concurrency runtime")]
    NoRuntime,

    /// The runtime has no queued work and no pending timers, but the future
    /// passed to [`Runtime::try_block_on`] is still pending.
    ///
    /// [`Runtime::try_block_on`]: crate::runtime::Runtime::try_block_on
    #[error("runtime stalled: nothing left to run and the main future is still pending")]
    Stalled,
}

/// The rejection reason produced by [`reject_after`] once its delay has passed.
///
/// [`reject_after`]: crate::time::reject_after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline has elapsed")]
pub struct Elapsed(());

impl Elapsed {
    pub(crate) fn new() -> Self {
        Elapsed(())
    }
}
