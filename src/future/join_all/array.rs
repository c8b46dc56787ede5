use super::JoinAll as JoinAllTrait;
use crate::promise::{normalize, IntoPromise, Promise};
use crate::utils::into_array;

impl<P: IntoPromise, const N: usize> JoinAllTrait for [P; N] {
    type Output = [P::Value; N];
    type Error = P::Error;

    fn join_all(self) -> Promise<Self::Output, Self::Error> {
        if N == 0 {
            return Promise::fulfilled(into_array(Vec::new()));
        }
        super::vec::join(normalize(self)).map(into_array)
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
            let res = [delayed(20, Ok::<_, ()>(1)), delayed(10, Ok(2))]
                .join_all()
                .await;
            assert_eq!(res, Ok([1, 2]));
        });
    }

    #[test]
    fn results_are_settled_promises() {
        let rt = paused();
        rt.block_on(async {
            let res = [Ok(1), Err("nope"), Ok(3)].join_all().await;
            assert_eq!(res, Err("nope"));
        });
    }

    #[test]
    fn empty() {
        let rt = paused();
        let _guard = rt.enter();
        let aggregate = <[Promise<u8, ()>; 0]>::join_all([]);
        assert!(aggregate.is_settled());
        assert_eq!(rt.block_on(aggregate), Ok([]));
    }

    #[test]
    fn empty_outside_a_runtime() {
        let aggregate = <[Promise<u8, ()>; 0]>::join_all([]);
        assert!(aggregate.is_settled());
    }
}
