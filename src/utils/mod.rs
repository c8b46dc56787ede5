//! Utilities to implement the different combinators of this crate.

mod output;

pub(crate) use output::OutputVec;

#[cfg(test)]
pub(crate) mod testing;

/// Convert a vector which is known to hold `N` values into an array.
pub(crate) fn into_array<T, const N: usize>(values: Vec<T>) -> [T; N] {
    match values.try_into() {
        Ok(array) => array,
        Err(values) => unreachable!("expected {} values, got {}", N, values.len()),
    }
}
