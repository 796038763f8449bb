//! Commonly used items for convenient importing.
//!
//! ```rust
//! use multicause::prelude::*;
//!
//! fn close_all(names: &[&'static str]) -> Result<(), Failure<&'static str>> {
//!     let mut collector = Collector::new();
//!     for name in names {
//!         if name.is_empty() {
//!             collector.push("empty name");
//!         }
//!     }
//!     collector.finish()
//! }
//!
//! assert!(close_all(&["a", "b"]).is_ok());
//! ```
//!
//! # What's Included
//!
//! - **[`Failure`]** and **[`AggregateError`]**: the failure values
//! - **[`Collector`]**: the stateful accumulator
//! - **[`IteratorExt`]**: extension methods for iterators of `Result`s
//! - **[`merge`]** and **[`combine`]**: the stateless merge functions

pub use crate::{AggregateError, Collector, Failure, IteratorExt, combine, merge};
