use std::mem::{self, MaybeUninit};

use fixedbitset::FixedBitSet;

/// A fixed number of slots, each written exactly once, taken all at once.
///
/// This is the shared result buffer of the aggregating combinators: item `i`
/// only ever writes slot `i`, and the buffer counts how many slots are still
/// outstanding.
pub(crate) struct OutputVec<T> {
    items: Vec<MaybeUninit<T>>,
    filled: FixedBitSet,
    remaining: usize,
}

impl<T> OutputVec<T> {
    /// Initialize `len` empty slots.
    pub(crate) fn uninit(len: usize) -> Self {
        Self {
            items: std::iter::repeat_with(MaybeUninit::uninit)
                .take(len)
                .collect(),
            filled: FixedBitSet::with_capacity(len),
            remaining: len,
        }
    }

    /// Write a value into the slot at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if the slot was already written.
    pub(crate) fn write(&mut self, idx: usize, value: T) {
        assert!(!self.filled.put(idx), "slot {idx} written twice");
        self.items[idx].write(value);
        self.remaining -= 1;
    }

    /// Returns `true` once every slot has been written.
    pub(crate) fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Take every value in slot order, leaving an empty buffer behind.
    ///
    /// # Panics
    ///
    /// Panics if any slot has not been written.
    pub(crate) fn take(&mut self) -> Vec<T> {
        assert!(self.is_filled(), "taking a partially written output");
        let items = mem::take(&mut self.items);
        self.filled.clear();
        items
            .into_iter()
            // SAFETY: every slot has been written exactly once, and `filled` was
            // just cleared so `Drop` won't touch the moved-out values.
            .map(|item| unsafe { item.assume_init() })
            .collect()
    }
}

/// Drop the values written so far.
impl<T> Drop for OutputVec<T> {
    fn drop(&mut self) {
        for idx in self.filled.ones() {
            // SAFETY: `filled` only marks slots which hold an initialized value.
            unsafe { self.items[idx].assume_init_drop() };
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn out_of_order_writes() {
        let mut output = OutputVec::uninit(3);
        output.write(2, "c");
        output.write(0, "a");
        assert!(!output.is_filled());
        output.write(1, "b");
        assert!(output.is_filled());
        assert_eq!(output.take(), vec!["a", "b", "c"]);
    }

    #[test]
    #[should_panic(expected = "written twice")]
    fn double_write() {
        let mut output = OutputVec::uninit(2);
        output.write(1, ());
        output.write(1, ());
    }

    #[test]
    fn drops_partial_output() {
        let value = Rc::new(());
        let mut output = OutputVec::uninit(2);
        output.write(0, value.clone());
        assert_eq!(Rc::strong_count(&value), 2);
        drop(output);
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    fn empty() {
        let mut output = OutputVec::<u8>::uninit(0);
        assert!(output.is_filled());
        assert!(output.take().is_empty());
    }
}
