use super::AggregateError;
use super::FirstFulfilled as FirstFulfilledTrait;
use crate::promise::{self, normalize, IntoPromise, Promise, Resolver};
use crate::utils::OutputVec;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

struct RaceOk<T, E> {
    settled: bool,
    reasons: OutputVec<E>,
    resolver: Resolver<T, AggregateError<E>>,
}

impl<T: 'static, E: 'static> RaceOk<T, E> {
    fn on_item(&mut self, index: usize, outcome: Result<T, E>) {
        if self.settled {
            trace!(index, "discarding late settlement");
            return;
        }

        match outcome {
            Ok(value) => {
                self.settled = true;
                self.reasons = OutputVec::uninit(0);
                debug!(index, "promise fulfilled");
                self.resolver.fulfill(value);
            }
            Err(reason) => {
                self.reasons.write(index, reason);
                if self.reasons.is_filled() {
                    self.settled = true;
                    let reasons = self.reasons.take();
                    debug!(len = reasons.len(), "all promises rejected");
                    self.resolver.reject(AggregateError::new(reasons));
                }
            }
        }
    }
}

pub(crate) fn race_ok<T, E>(promises: Vec<Promise<T, E>>) -> Promise<T, AggregateError<E>>
where
    T: 'static,
    E: 'static,
{
    if promises.is_empty() {
        return Promise::rejected(AggregateError::new(Vec::new()));
    }

    let (resolver, aggregate) = promise::channel();
    let state = Rc::new(RefCell::new(RaceOk {
        settled: false,
        reasons: OutputVec::uninit(promises.len()),
        resolver,
    }));

    for (index, item) in promises.into_iter().enumerate() {
        let state = state.clone();
        item.on_settle(move |outcome| state.borrow_mut().on_item(index, outcome));
    }
    aggregate
}

impl<P: IntoPromise> FirstFulfilledTrait for Vec<P> {
    type Output = P::Value;
    type Error = AggregateError<P::Error>;

    fn first_fulfilled(self) -> Promise<Self::Output, Self::Error> {
        race_ok(normalize(self))
    }
}
