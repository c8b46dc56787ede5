use criterion::{black_box, criterion_group, criterion_main, Criterion};
use promise_concurrency::future::{first_settled, join_all, join_all_settled};
use promise_concurrency::runtime::{spawn, Runtime};
use promise_concurrency::time::sleep;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("join_all 10", |b| b.iter(|| join_all_test(black_box(10))));
    c.bench_function("join_all 100", |b| b.iter(|| join_all_test(black_box(100))));
    c.bench_function("join_all 1000", |b| b.iter(|| join_all_test(black_box(1000))));
    c.bench_function("join_all_settled 1000", |b| {
        b.iter(|| join_all_settled_test(black_box(1000)))
    });
    c.bench_function("first_settled 1000", |b| {
        b.iter(|| first_settled_test(black_box(1000)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

/// Join `max` tasks which each yield to the timer queue once.
fn join_all_test(max: usize) {
    let rt = Runtime::builder().start_paused(true).build();
    let values = rt.block_on(async {
        let items = (0..max).map(|n| {
            spawn(async move {
                sleep((max - n) as i64).await;
                Ok::<_, ()>(n)
            })
        });
        join_all(items).await
    });
    assert_eq!(values.map(|v| v.len()), Ok(max));
}

fn join_all_settled_test(max: usize) {
    let rt = Runtime::new();
    let records = rt.block_on(join_all_settled(
        (0..max).map(|n| if n % 2 == 0 { Ok(n) } else { Err(n) }),
    ));
    assert_eq!(records.map(|r| r.len()), Ok(max));
}

fn first_settled_test(max: usize) {
    let rt = Runtime::builder().start_paused(true).build();
    let winner = rt.block_on(async {
        let items = (0..max).map(|n| {
            spawn(async move {
                sleep((max - n) as i64).await;
                Ok::<_, ()>(n)
            })
        });
        first_settled(items).await
    });
    assert_eq!(winner, Ok(max - 1));
}
