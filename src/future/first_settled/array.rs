use super::FirstSettled as FirstSettledTrait;
use crate::promise::{normalize, IntoPromise, Promise};

impl<P: IntoPromise, const N: usize> FirstSettledTrait for [P; N] {
    type Output = P::Value;
    type Error = P::Error;

    fn first_settled(self) -> Promise<Self::Output, Self::Error> {
        super::vec::race(normalize(self))
    }
}
