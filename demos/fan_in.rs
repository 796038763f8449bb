// Fan-in of failures from concurrent workers
//
// Workers either share one SharedCollector, or each fill their own Collector
// that is absorbed after the join. Both give every failure in one value. A
// panicking worker is not a failure to collect: it is resumed on the caller.

use std::{panic, thread};

use multicause::{BoxError, Collector, Failure, SharedCollector};

fn fetch(shard: u32) -> Result<u32, BoxError> {
    match shard % 4 {
        1 => Err(format!("shard {shard} timed out").into()),
        3 => Err(std::io::Error::other(format!("shard {shard} refused the connection")).into()),
        _ => Ok(shard * 10),
    }
}

// Every worker appends through a shared reference
fn fetch_shared(shards: u32) -> (u32, Option<Failure<BoxError>>) {
    let collector: SharedCollector<BoxError> = SharedCollector::new();
    let total = thread::scope(|scope| {
        let handles: Vec<_> = (0..shards)
            .map(|shard| {
                let collector = &collector;
                scope.spawn(move || collector.append_func(|| fetch(shard)).unwrap_or(0))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .sum::<u32>()
    });
    (total, collector.into_inner().into_result())
}

// Every worker owns a collector, merged once all of them are joined
fn fetch_owned(shards: u32) -> Option<Failure<BoxError>> {
    let workers: Vec<Collector<BoxError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..shards)
            .map(|shard| {
                scope.spawn(move || {
                    let mut collector: Collector<BoxError> = Collector::new();
                    collector.append_result(fetch(shard));
                    collector
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect()
    });

    let mut total: Collector<BoxError> = Collector::new();
    for worker in workers {
        total.absorb(worker);
    }
    total.into_result()
}

fn main() {
    println!("Example 1: SharedCollector\n");
    let (total, failure) = fetch_shared(8);
    println!("Sum of successful shards: {total}");
    if let Some(failure) = failure {
        eprintln!("{failure:#}\n");
    }

    println!("Example 2: One collector per worker\n");
    if let Some(failure) = fetch_owned(8) {
        // The aggregate survives type erasure and is flattened again
        let erased = failure.into_boxed();
        let mut outer: Option<Failure<BoxError>> = Some(Failure::from(BoxError::from(
            "coordinator gave up",
        )));
        multicause::append_boxed_into(&mut outer, Some(erased));
        if let Some(outer) = outer {
            eprintln!("{} failures: {outer}", outer.len());
        }
    }
}
