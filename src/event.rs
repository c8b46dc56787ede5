//! A minimal single-threaded event emitter, and a bridge from events to
//! promises.
//!
//! # Examples
//!
//! ```
//! use promise_concurrency::event::{once, EventEmitter};
//! use promise_concurrency::runtime::Runtime;
//!
//! let emitter = EventEmitter::<u32>::new();
//! let ready = once(&emitter, "ready");
//! assert_eq!(emitter.listener_count("ready"), 1);
//!
//! emitter.emit("ready", &7);
//! emitter.emit("ready", &8);
//! assert_eq!(emitter.listener_count("ready"), 0);
//! assert_eq!(Runtime::new().block_on(ready), Ok(7));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;

use slab::Slab;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::promise::{self, Promise};

type Callback<E> = Rc<dyn Fn(&E)>;

/// Identifies a listener registered on an [`EventEmitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId {
    key: usize,
    generation: u64,
}

struct Listener<E> {
    event: String,
    generation: u64,
    once: bool,
    callback: Callback<E>,
}

struct Registry<E> {
    listeners: Slab<Listener<E>>,
    events: HashMap<String, SmallVec<[usize; 4]>>,
    generation: u64,
}

impl<E> Registry<E> {
    fn insert(&mut self, event: String, once: bool, callback: Callback<E>) -> ListenerId {
        self.generation += 1;
        let generation = self.generation;
        let key = self.listeners.insert(Listener {
            event: event.clone(),
            generation,
            once,
            callback,
        });
        self.events.entry(event).or_default().push(key);
        ListenerId { key, generation }
    }

    fn remove(&mut self, key: usize) -> Listener<E> {
        let listener = self.listeners.remove(key);
        if let Some(keys) = self.events.get_mut(&listener.event) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.events.remove(&listener.event);
            }
        }
        listener
    }
}

/// Dispatches named events to registered listeners.
///
/// Cloning an emitter yields another handle to the same set of listeners.
pub struct EventEmitter<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E> EventEmitter<E> {
    /// Create an emitter without any listeners.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                listeners: Slab::new(),
                events: HashMap::new(),
                generation: 0,
            })),
        }
    }

    /// Register `callback` for every emission of `event`.
    pub fn on<F>(&self, event: impl Into<String>, callback: F) -> ListenerId
    where
        F: Fn(&E) + 'static,
    {
        self.registry
            .borrow_mut()
            .insert(event.into(), false, Rc::new(callback))
    }

    /// Register `callback` for the next emission of `event` only.
    ///
    /// The listener is removed before it is invoked.
    pub fn once<F>(&self, event: impl Into<String>, callback: F) -> ListenerId
    where
        F: Fn(&E) + 'static,
    {
        self.registry
            .borrow_mut()
            .insert(event.into(), true, Rc::new(callback))
    }

    /// Remove a listener.
    ///
    /// Returns `false` if it was already removed.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let registered = registry
            .listeners
            .get(id.key)
            .is_some_and(|listener| listener.generation == id.generation);
        if registered {
            registry.remove(id.key);
        }
        registered
    }

    /// Invoke every listener of `event` with `payload`, in registration order.
    ///
    /// Listeners registered or removed by a listener take effect from the
    /// next emission. Returns the number of listeners invoked.
    pub fn emit(&self, event: &str, payload: &E) -> usize {
        let callbacks: SmallVec<[Callback<E>; 4]> = {
            let mut registry = self.registry.borrow_mut();
            let keys = match registry.events.get(event) {
                Some(keys) => keys.clone(),
                None => {
                    trace!(event, "no listeners for event");
                    return 0;
                }
            };
            keys.into_iter()
                .map(|key| {
                    if registry.listeners[key].once {
                        registry.remove(key).callback
                    } else {
                        registry.listeners[key].callback.clone()
                    }
                })
                .collect()
        };

        debug!(event, listeners = callbacks.len(), "emitting event");
        for callback in &callbacks {
            callback(payload);
        }
        callbacks.len()
    }

    /// The number of listeners currently registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry
            .borrow()
            .events
            .get(event)
            .map_or(0, SmallVec::len)
    }
}

impl<E> Clone for EventEmitter<E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("EventEmitter")
            .field("events", &registry.events.len())
            .field("listeners", &registry.listeners.len())
            .finish()
    }
}

/// A promise which fulfills with the next emission of `event`.
///
/// The listener backing the promise is removed after exactly one emission.
pub fn once<E>(emitter: &EventEmitter<E>, event: impl Into<String>) -> Promise<E, Infallible>
where
    E: Clone + 'static,
{
    let (resolver, promise) = promise::channel();
    emitter.once(event, move |payload: &E| {
        resolver.fulfill(payload.clone());
    });
    promise
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::runtime::Runtime;
    use std::cell::Cell;

    #[test]
    fn on_and_emit() {
        let emitter = EventEmitter::<u32>::new();
        let total = Rc::new(Cell::new(0));

        let sum = total.clone();
        emitter.on("add", move |n| sum.set(sum.get() + n));
        assert_eq!(emitter.emit("add", &2), 1);
        assert_eq!(emitter.emit("add", &3), 1);
        assert_eq!(emitter.emit("other", &100), 0);
        assert_eq!(total.get(), 5);
    }

    #[test]
    fn registration_order() {
        let emitter = EventEmitter::<()>::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let order = order.clone();
            emitter.on("tick", move |_| order.borrow_mut().push(i));
        }
        emitter.emit("tick", &());
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn off() {
        let emitter = EventEmitter::<()>::new();
        let id = emitter.on("tick", |_| panic!("removed listener invoked"));
        assert!(emitter.off(id));
        assert!(!emitter.off(id));
        assert_eq!(emitter.emit("tick", &()), 0);
    }

    #[test]
    fn stale_ids_do_not_remove_new_listeners() {
        let emitter = EventEmitter::<()>::new();
        let stale = emitter.on("a", |_| {});
        emitter.off(stale);
        let _fresh = emitter.on("b", |_| {});
        assert!(!emitter.off(stale));
        assert_eq!(emitter.listener_count("b"), 1);
    }

    #[test]
    fn once_listener_runs_once() {
        let emitter = EventEmitter::<()>::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let id = emitter.once("tick", move |_| counter.set(counter.get() + 1));

        emitter.emit("tick", &());
        emitter.emit("tick", &());
        assert_eq!(calls.get(), 1);
        assert_eq!(emitter.listener_count("tick"), 0);
        assert!(!emitter.off(id));
    }

    #[test]
    fn listeners_may_emit() {
        let emitter = EventEmitter::<u8>::new();
        let seen = Rc::new(Cell::new(0));

        let inner = emitter.clone();
        emitter.on("outer", move |n| {
            inner.emit("inner", n);
        });
        let sink = seen.clone();
        emitter.on("inner", move |n| sink.set(*n));

        emitter.emit("outer", &9);
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn once_promise() {
        let rt = Runtime::new();
        let emitter = EventEmitter::<String>::new();
        let ready = once(&emitter, "ready");

        emitter.emit("ready", &"first".to_string());
        emitter.emit("ready", &"second".to_string());
        assert_eq!(emitter.listener_count("ready"), 0);
        assert_eq!(rt.block_on(ready), Ok("first".to_string()));
    }

    #[test]
    fn once_promise_awaited_before_emission() {
        let rt = Runtime::new();
        let emitter = EventEmitter::<u8>::new();
        let res = rt.block_on(async {
            let ready = once(&emitter, "ready");
            let sender = emitter.clone();
            let _ = crate::runtime::spawn(async move {
                sender.emit("ready", &1);
                Ok::<_, ()>(())
            });
            ready.await
        });
        assert_eq!(res, Ok(1));
    }
}
