//! Optional `tracing` events.
//!
//! With the `tracing` feature disabled the macro expands to nothing and its
//! arguments are never evaluated, so callers must only pass values they
//! compute anyway.

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "multicause", $($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($($arg:tt)*) => {};
}

pub(crate) use trace_event;
