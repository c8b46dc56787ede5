use super::FirstSettled as FirstSettledTrait;
use crate::promise::{self, normalize, IntoPromise, Promise, Resolver};

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, trace};

struct Race<T, E> {
    settled: Cell<bool>,
    resolver: Resolver<T, E>,
}

impl<T: 'static, E: 'static> Race<T, E> {
    fn on_item(&self, index: usize, outcome: Result<T, E>) {
        if self.settled.replace(true) {
            trace!(index, "discarding late settlement");
            return;
        }
        debug!(index, fulfilled = outcome.is_ok(), "race settled");
        self.resolver.settle(outcome);
    }
}

pub(crate) fn race<T, E>(promises: Vec<Promise<T, E>>) -> Promise<T, E>
where
    T: 'static,
    E: 'static,
{
    let (resolver, aggregate) = promise::channel();
    if promises.is_empty() {
        debug!("racing zero promises, the race never settles");
        return aggregate;
    }

    let state = Rc::new(Race {
        settled: Cell::new(false),
        resolver,
    });
    for (index, item) in promises.into_iter().enumerate() {
        let state = state.clone();
        item.on_settle(move |outcome| state.on_item(index, outcome));
    }
    aggregate
}

impl<P: IntoPromise> FirstSettledTrait for Vec<P> {
    type Output = P::Value;
    type Error = P::Error;

    fn first_settled(self) -> Promise<Self::Output, Self::Error> {
        race(normalize(self))
    }
}
