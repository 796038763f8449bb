#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![forbid(unsafe_code)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Aggregate zero, one or many failures into a single error value.
//!
//! ## Overview
//!
//! Some operations keep going after the first failure: best-effort cleanup,
//! validating every field of a form, closing every file in a batch. This
//! crate gives those operations a single value to return while keeping every
//! underlying failure reachable.
//!
//! The state of such an operation is an `Option<`[`Failure<E>`]`>`:
//! - `None` means nothing failed.
//! - [`Failure::Single`] holds exactly one failure, unchanged.
//! - [`Failure::Aggregate`] holds an [`AggregateError`] with two or more
//!   failures, in the order they were recorded.
//!
//! Merging never nests: merging an aggregate into another splices its
//! constituents in place. An aggregate with fewer than two constituents
//! never exists, so a caller that only ever saw one failure gets that
//! failure back as-is.
//!
//! ## Quick Example
//!
//! ```
//! use multicause::Collector;
//!
//! fn close(name: &'static str) -> Result<(), &'static str> {
//!     if name.starts_with("bad") { Err(name) } else { Ok(()) }
//! }
//!
//! let mut collector: Collector<&str> = Collector::new();
//! for name in ["a", "bad-b", "c", "bad-d"] {
//!     collector.append_func(|| close(name));
//! }
//!
//! assert_eq!(collector.len(), 2);
//! assert_eq!(collector.snapshot(), &["bad-b", "bad-d"]);
//! assert_eq!(collector.result().unwrap().to_string(), "bad-b; bad-d");
//! ```
//!
//! ## Two ways to accumulate
//!
//! Use a [`Collector`] when the failures belong to one logical unit of work
//! and you want a value that owns them. Use the free functions [`merge`],
//! [`combine`], [`append_into`] and [`append_func_into`] when you already
//! have an `Option<Failure<E>>` variable (for example a `Drop`-style cleanup
//! path) and just want to fold new failures into it. Both paths share the
//! same merge rules.
//!
//! ## Concurrency
//!
//! All operations are synchronous. A [`Collector`] has a single owner: every
//! mutating method takes `&mut self`. To collect from several threads either
//! give each worker its own collector and [`Collector::absorb`] them after
//! joining, or share a [`SharedCollector`], which guards a collector with a
//! read-write lock.
//!
//! ## Features
//!
//! - `std`: back [`SharedCollector`] with `std::sync::RwLock` instead of a
//!   spin lock.
//! - `tracing`: emit `trace`-level events through the [`tracing`] crate when
//!   failures are recorded or collectors are reset.
//!
//! [`tracing`]: https://docs.rs/tracing

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod instrument;

mod aggregate;
mod collector;
mod failure;
mod iterator_ext;
mod ops;
pub mod prelude;

pub use self::{
    aggregate::{AggregateError, IntoIter, Iter},
    collector::{Collector, SharedCollector},
    failure::{BoxError, Failure},
    iterator_ext::IteratorExt,
    ops::{
        append_boxed_into, append_func_into, append_into, combine, combine_boxed, extract, merge,
    },
};
