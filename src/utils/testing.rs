use std::time::Duration;

use crate::promise::Promise;
use crate::runtime::{self, Runtime};
use crate::time::sleep;

/// A runtime whose clock only moves when a timer fires.
pub(crate) fn paused() -> Runtime {
    Runtime::builder().start_paused(true).build()
}

/// A spawned computation which settles with `outcome` after `millis`.
pub(crate) fn delayed<T, E>(millis: u64, outcome: Result<T, E>) -> Promise<T, E>
where
    T: 'static,
    E: 'static,
{
    runtime::spawn(async move {
        sleep(Duration::from_millis(millis)).await;
        outcome
    })
}
