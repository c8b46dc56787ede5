use super::JoinAllSettled as JoinAllSettledTrait;
use crate::promise::{self, normalize, IntoPromise, Promise, Resolver, Settled};
use crate::utils::OutputVec;

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use tracing::debug;

struct JoinSettled<T, E> {
    settled: bool,
    records: OutputVec<Settled<T, E>>,
    resolver: Resolver<Vec<Settled<T, E>>, Infallible>,
}

impl<T: 'static, E: 'static> JoinSettled<T, E> {
    fn on_item(&mut self, index: usize, outcome: Result<T, E>) {
        if self.settled {
            return;
        }

        self.records.write(index, outcome.into());
        if self.records.is_filled() {
            self.settled = true;
            let records = self.records.take();
            debug!(len = records.len(), "all promises settled");
            self.resolver.fulfill(records);
        }
    }
}

pub(crate) fn join_settled<T, E>(
    promises: Vec<Promise<T, E>>,
) -> Promise<Vec<Settled<T, E>>, Infallible>
where
    T: 'static,
    E: 'static,
{
    if promises.is_empty() {
        return Promise::fulfilled(Vec::new());
    }

    let (resolver, aggregate) = promise::channel();
    let state = Rc::new(RefCell::new(JoinSettled {
        settled: false,
        records: OutputVec::uninit(promises.len()),
        resolver,
    }));

    for (index, item) in promises.into_iter().enumerate() {
        let state = state.clone();
        item.on_settle(move |outcome| state.borrow_mut().on_item(index, outcome));
    }
    aggregate
}

impl<P: IntoPromise> JoinAllSettledTrait for Vec<P> {
    type Output = Vec<Settled<P::Value, P::Error>>;

    fn join_all_settled(self) -> Promise<Self::Output, Infallible> {
        join_settled(normalize(self))
    }
}
