// Cleanup with error collection
//
// Releasing several resources should attempt every release, even after one
// of them fails, and report every failure to the caller.

use std::io;

use multicause::{Collector, Failure, append_func_into, prelude::*};

#[derive(Debug, thiserror::Error)]
enum ReleaseError {
    #[error("failed to flush {name}")]
    Flush {
        name: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("lock on {0} is already released")]
    Unlocked(&'static str),
}

struct Resource {
    name: &'static str,
    dirty: bool,
    locked: bool,
}

impl Resource {
    fn flush(&self) -> Result<(), ReleaseError> {
        if self.dirty {
            Err(ReleaseError::Flush {
                name: self.name,
                source: io::Error::new(io::ErrorKind::WriteZero, "disk full"),
            })
        } else {
            Ok(())
        }
    }

    fn unlock(&self) -> Result<(), ReleaseError> {
        if self.locked {
            Ok(())
        } else {
            Err(ReleaseError::Unlocked(self.name))
        }
    }
}

// A collector owned by the cleanup routine
fn release_all(resources: &[Resource]) -> Result<(), Failure<ReleaseError>> {
    let mut collector = Collector::new();
    for resource in resources {
        collector.append_func(|| resource.flush());
        collector.append_result(resource.unlock());
    }
    collector.finish()
}

// The same routine for code that already keeps an Option<Failure<E>> around
fn release_into(resources: &[Resource], failure: &mut Option<Failure<ReleaseError>>) {
    for resource in resources {
        append_func_into(failure, || resource.flush());
        append_func_into(failure, || resource.unlock());
    }
}

fn main() {
    let resources = [
        Resource {
            name: "journal",
            dirty: true,
            locked: true,
        },
        Resource {
            name: "index",
            dirty: false,
            locked: true,
        },
        Resource {
            name: "cache",
            dirty: true,
            locked: false,
        },
    ];

    println!("Example 1: Collector\n");
    match release_all(&resources) {
        Ok(()) => println!("Everything released"),
        Err(failure) => {
            eprintln!("{} failures: {failure}\n", failure.len());
            eprintln!("{failure:#}\n");
        }
    }

    println!("Example 2: Appending into an existing slot\n");
    let mut failure = None;
    release_into(&resources[1..], &mut failure);
    match failure {
        None => println!("Everything released"),
        Some(failure) => {
            for error in &failure {
                eprintln!("- {error}");
            }
        }
    }

    println!("\nExample 3: Single failures are not wrapped\n");
    let failure: Option<Failure<ReleaseError>> =
        combine([None, Some(ReleaseError::Unlocked("index")), None]);
    if let Some(failure) = failure {
        println!("aggregate: {}, message: {failure}", failure.is_aggregate());
    }
}
