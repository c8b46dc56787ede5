use super::JoinAllSettled as JoinAllSettledTrait;
use crate::promise::{normalize, IntoPromise, Promise, Settled};
use crate::utils::into_array;

use std::convert::Infallible;

impl<P: IntoPromise, const N: usize> JoinAllSettledTrait for [P; N] {
    type Output = [Settled<P::Value, P::Error>; N];

    fn join_all_settled(self) -> Promise<Self::Output, Infallible> {
        if N == 0 {
            return Promise::fulfilled(into_array(Vec::new()));
        }
        super::vec::join_settled(normalize(self)).map(into_array)
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
            let records = [delayed(10, Err(1)), delayed(5, Ok("x"))]
                .join_all_settled()
                .await;
            assert_eq!(records, Ok([Settled::Rejected(1), Settled::Fulfilled("x")]));
        });
    }

    #[test]
    fn empty() {
        let rt = paused();
        let _guard = rt.enter();
        let aggregate = <[Result<u8, ()>; 0]>::join_all_settled([]);
        assert!(aggregate.is_settled());
        assert_eq!(rt.block_on(aggregate), Ok([]));
    }

    #[test]
    fn empty_outside_a_runtime() {
        let aggregate = <[Promise<u8, u8>; 0]>::join_all_settled([]);
        assert!(aggregate.is_settled());
    }
}
