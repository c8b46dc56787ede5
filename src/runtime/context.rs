use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use super::Handle;

thread_local! {
    /// The runtime driving the current thread, if any.
    static CURRENT: RefCell<Option<Handle>> = const { RefCell::new(None) };
}

pub(crate) fn current() -> Option<Handle> {
    CURRENT.with(|current| current.borrow().clone())
}

/// Makes a runtime the current one until dropped.
///
/// This `struct` is created by [`Runtime::enter`]. Guards must be dropped in
/// reverse order of creation.
///
/// [`Runtime::enter`]: crate::runtime::Runtime::enter
#[derive(Debug)]
#[must_use = "the runtime is only entered while the guard is held"]
pub struct EnterGuard {
    prev: Option<Handle>,
    _not_send: PhantomData<Rc<()>>,
}

pub(crate) fn enter(handle: Handle) -> EnterGuard {
    let prev = CURRENT.with(|current| current.borrow_mut().replace(handle));
    EnterGuard {
        prev,
        _not_send: PhantomData,
    }
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        let prev = self.prev.take();
        CURRENT.with(|current| *current.borrow_mut() = prev);
    }
}
