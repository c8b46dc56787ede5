//! Composition primitives over promises: one-shot asynchronous values which
//! either fulfill with a value or reject with a reason.
//!
//! The crate ships its own single-threaded [`runtime`], with an immediate
//! queue for task polls and promise continuations and a timer queue for
//! delays. On top of it, the [`future`] module provides combinators which
//! aggregate many promises into one, and the [`time`] module provides the
//! delayed fulfillment and delayed rejection they build on.
//!
//! # Operations
//!
//! The combinators accept vecs, arrays, and anything else which can be
//! iterated over, of items converting into a [`Promise`]:
//!
//! - [`future::JoinAll`]: Wait for all promises to fulfill, or reject on the first rejection.
//! - [`future::JoinAllSettled`]: Wait for all promises to settle.
//! - [`future::FirstSettled`]: Adopt the outcome of the first promise to settle.
//! - [`future::FirstFulfilled`]: Fulfill with the first promise to fulfill.
//! - [`future::Deadline`]: Reject if a promise does not settle in time.
//!
//! Nothing is ever cancelled. Once an aggregate has settled, the items it was
//! built from keep running, and their outcomes are discarded.
//!
//! # Examples
//!
//! ```rust
//! use promise_concurrency::prelude::*;
//! use promise_concurrency::runtime::{spawn, Runtime};
//! use promise_concurrency::time::sleep;
//!
//! let rt = Runtime::builder().start_paused(true).build();
//! rt.block_on(async {
//!     let slow = spawn(async {
//!         sleep(50i64).await;
//!         Ok::<_, &str>("slow")
//!     });
//!     let values = [slow, Promise::fulfilled("fast")].join_all().await;
//!     assert_eq!(values, Ok(["slow", "fast"]));
//!
//!     let never = spawn(std::future::pending::<Result<(), &str>>());
//!     assert!(never.deadline(200i64).await.unwrap_err().is_elapsed());
//! });
//! ```
//!
//! [`Promise`]: promise::Promise

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod error;
mod utils;

pub mod event;
pub mod future;
pub mod promise;
pub mod runtime;
pub mod time;

pub use error::{Elapsed, Error};

/// The promise concurrency prelude.
pub mod prelude {
    pub use super::future::Deadline as _;
    pub use super::future::FirstFulfilled as _;
    pub use super::future::FirstSettled as _;
    pub use super::future::JoinAll as _;
    pub use super::future::JoinAllSettled as _;

    pub use super::promise::{IntoPromise, Item, Promise, Settled, Shared};
}
