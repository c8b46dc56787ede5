//! Combinators over promises.
//!
//! Every combinator takes a collection of items which convert into promises
//! (see [`IntoPromise`]), drains it once, and returns a single aggregate
//! [`Promise`]. None of them block or poll anything themselves: they register
//! a continuation on each item and settle the aggregate from those
//! continuations.
//!
//! # Examples
//!
//! ```
//! use promise_concurrency::prelude::*;
//! use promise_concurrency::runtime::Runtime;
//!
//! let rt = Runtime::new();
//! rt.block_on(async {
//!     // Wait for all values, in input order.
//!     let a = Promise::<_, ()>::fulfilled(1);
//!     let b = Promise::fulfilled(2);
//!     assert_eq!([a, b].join_all().await, Ok([1, 2]));
//!
//!     // Wait for all outcomes, whatever they are.
//!     let records = vec![Ok(1), Err("nope")].join_all_settled().await;
//!     assert_eq!(records, Ok(vec![Settled::Fulfilled(1), Settled::Rejected("nope")]));
//!
//!     // Take whichever settles first.
//!     assert_eq!(vec![Ok::<_, ()>("first"), Ok("second")].first_settled().await, Ok("first"));
//! });
//! ```
//!
//! # Combinators
//!
//! | Name              | Fulfills with          | Rejects with          | When does it settle?
//! | ---               | ---                    | ---                   | ---
//! | `JoinAll`         | `Vec<T>`               | `E`                   | Fulfill when all fulfill, reject on first `Err`
//! | `JoinAllSettled`  | `Vec<Settled<T, E>>`   | never                 | When all have settled
//! | `FirstSettled`    | `T`                    | `E`                   | On first outcome; never for an empty input
//! | `FirstFulfilled`  | `T`                    | `AggregateError<E>`   | On first `Ok`, reject when all have rejected
//! | `Deadline`        | `T`                    | `DeadlineError<E>`    | On the computation's outcome, or when the delay passes
//!
//! "First" always means first by completion time, not by position. Items
//! which settle at the same time are observed in input order.
//!
//! Nothing is ever cancelled: items still pending once an aggregate has
//! settled keep running, and their outcomes are discarded.
//!
//! [`IntoPromise`]: crate::promise::IntoPromise
//! [`Promise`]: crate::promise::Promise

mod deadline;
mod first_fulfilled;
mod first_settled;
mod join_all;
mod join_all_settled;

pub use deadline::{deadline, Deadline, DeadlineError};
pub use first_fulfilled::{first_fulfilled, AggregateError, FirstFulfilled};
pub use first_settled::{first_settled, FirstSettled};
pub use join_all::{join_all, JoinAll};
pub use join_all_settled::{join_all_settled, JoinAllSettled};
