use super::JoinAll as JoinAllTrait;
use crate::promise::{self, normalize, IntoPromise, Promise, Resolver};
use crate::utils::OutputVec;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

/// Shared between the aggregate and the continuation of every item.
struct Join<T, E> {
    settled: bool,
    items: OutputVec<T>,
    resolver: Resolver<Vec<T>, E>,
}

impl<T: 'static, E: 'static> Join<T, E> {
    fn on_item(&mut self, index: usize, outcome: Result<T, E>) {
        if self.settled {
            trace!(index, "discarding late settlement");
            return;
        }

        match outcome {
            Ok(value) => {
                self.items.write(index, value);
                if self.items.is_filled() {
                    self.settled = true;
                    let values = self.items.take();
                    debug!(len = values.len(), "all promises fulfilled");
                    self.resolver.fulfill(values);
                }
            }
            Err(reason) => {
                self.settled = true;
                // The values written so far will never be read.
                self.items = OutputVec::uninit(0);
                debug!(index, "promise rejected, short-circuiting");
                self.resolver.reject(reason);
            }
        }
    }
}

pub(crate) fn join<T, E>(promises: Vec<Promise<T, E>>) -> Promise<Vec<T>, E>
where
    T: 'static,
    E: 'static,
{
    if promises.is_empty() {
        return Promise::fulfilled(Vec::new());
    }

    let (resolver, aggregate) = promise::channel();
    let state = Rc::new(RefCell::new(Join {
        settled: false,
        items: OutputVec::uninit(promises.len()),
        resolver,
    }));

    for (index, item) in promises.into_iter().enumerate() {
        let state = state.clone();
        item.on_settle(move |outcome| state.borrow_mut().on_item(index, outcome));
    }
    aggregate
}

impl<P: IntoPromise> JoinAllTrait for Vec<P> {
    type Output = Vec<P::Value>;
    type Error = P::Error;

    fn join_all(self) -> Promise<Self::Output, Self::Error> {
        join(normalize(self))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::promise::Item;
    use crate::runtime::now;
    use crate::utils::testing::{delayed, paused};
    use futures::future::{FutureExt, LocalBoxFuture};
    use std::cell::Cell;
    use std::time::Duration;

    #[test]
    fn smoke() {
        let rt = paused();
        rt.block_on(async {
            let res = vec![Promise::<_, ()>::fulfilled("hello"), Promise::fulfilled("world")]
                .join_all()
                .await;
            assert_eq!(res, Ok(vec!["hello", "world"]));
        });
    }

    #[test]
    fn empty() {
        let rt = paused();
        let _guard = rt.enter();
        let aggregate = Vec::<Promise<u8, ()>>::new().join_all();
        assert!(aggregate.is_settled());
        assert_eq!(rt.block_on(aggregate), Ok(vec![]));
    }

    #[test]
    fn preserves_input_order() {
        let rt = paused();
        rt.block_on(async {
            let items = vec![
                delayed(50, Ok::<_, ()>("slow")),
                delayed(0, Ok("fast")),
                Promise::fulfilled("plain"),
            ];
            assert_eq!(items.join_all().await, Ok(vec!["slow", "fast", "plain"]));
        });
    }

    #[test]
    fn short_circuits_on_first_rejection() {
        let rt = paused();
        rt.block_on(async {
            let start = now();
            let items = vec![
                delayed(0, Ok("ok")),
                delayed(10, Err("BOOM")),
                delayed(1000, Ok("ignored")),
            ];
            assert_eq!(items.join_all().await, Err("BOOM"));
            assert_eq!(now() - start, Duration::from_millis(10));
        });
    }

    #[test]
    fn first_rejection_by_completion_order() {
        let rt = paused();
        rt.block_on(async {
            let items = vec![delayed::<(), _>(20, Err("first index")), delayed(10, Err("first done"))];
            assert_eq!(items.join_all().await, Err("first done"));
        });
    }

    #[test]
    fn late_outcomes_are_discarded() {
        let rt = paused();
        let finished = Rc::new(Cell::new(false));
        rt.block_on(async {
            let flag = finished.clone();
            let late = crate::runtime::spawn(async move {
                crate::time::sleep(Duration::from_millis(100)).await;
                flag.set(true);
                Ok::<_, &str>(1)
            });
            let items = vec![late, Promise::rejected("BOOM")];
            assert_eq!(items.join_all().await, Err("BOOM"));
            assert!(!finished.get());

            // The pending item keeps running to completion.
            crate::time::sleep(Duration::from_millis(200)).await;
        });
        assert!(finished.get());
    }

    #[test]
    fn drops_partial_output_on_rejection() {
        let rt = paused();
        let value = Rc::new(());
        rt.block_on(async {
            let items = vec![
                Promise::fulfilled(value.clone()),
                delayed(10, Err(())),
                delayed(20, Ok(value.clone())),
            ];
            assert!(items.join_all().await.is_err());
            assert_eq!(Rc::strong_count(&value), 2);
            crate::time::sleep(Duration::from_millis(50)).await;
        });
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    fn mixed_items() {
        let rt = paused();
        rt.block_on(async {
            let items: Vec<Item<u8, LocalBoxFuture<'static, Result<u8, ()>>>> = vec![
                Item::Value(1),
                Item::Pending(
                    async {
                        crate::time::sleep(Duration::from_millis(5)).await;
                        Ok(2)
                    }
                    .boxed_local(),
                ),
            ];
            assert_eq!(items.join_all().await, Ok(vec![1, 2]));
        });
    }
}
