use super::AggregateError;
use super::FirstFulfilled as FirstFulfilledTrait;
use crate::promise::{normalize, IntoPromise, Promise};

impl<P: IntoPromise, const N: usize> FirstFulfilledTrait for [P; N] {
    type Output = P::Value;
    type Error = AggregateError<P::Error>;

    fn first_fulfilled(self) -> Promise<Self::Output, Self::Error> {
        super::vec::race_ok(normalize(self))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::testing::{delayed, paused};

    #[test]
    fn smoke() {
        let rt = paused();
        rt.block_on(async {
            let res = [delayed(5, Err(1)), delayed(10, Ok("two")), Promise::rejected(3)]
                .first_fulfilled()
                .await;
            assert_eq!(res, Ok("two"));
        });
    }
}
