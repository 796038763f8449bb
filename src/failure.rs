use alloc::{boxed::Box, vec, vec::Vec};
use core::{fmt, slice};

use crate::aggregate::{AggregateError, IntoIter, Iter};

/// A type-erased, thread-safe error, the usual constituent type when
/// failures of different types are merged together.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// One failure or an aggregate of several.
///
/// This is the value produced by every merge operation in this crate. The
/// absence of a failure is not a `Failure`: it is represented by `None`, so
/// the full "nothing, one or many" state of an operation is an
/// `Option<Failure<E>>`.
///
/// A `Failure` holding a single error is transparent: it displays, debugs and
/// reports its [`source`](core::error::Error::source) exactly like the error
/// it wraps, and [`into_single`](Self::into_single) hands the original value
/// back unchanged.
///
/// `Failure<E>` implements [`Error`](core::error::Error) only when `E` does,
/// because [`source`](core::error::Error::source) of a single failure is the
/// source of its error. [`AggregateError<E>`] only needs `E: Debug +
/// Display`. [`BoxError`] is not itself an `Error`, so a `Failure<BoxError>`
/// is turned into one with [`into_boxed`](Failure::into_boxed):
///
/// ```
/// use multicause::{BoxError, Collector, Failure};
///
/// fn run() -> Result<(), BoxError> {
///     let mut collector: Collector<BoxError> = Collector::new();
///     collector.push(BoxError::from("a"));
///     collector.push(BoxError::from("b"));
///     collector.finish().map_err(Failure::into_boxed)?;
///     Ok(())
/// }
///
/// assert_eq!(run().unwrap_err().to_string(), "a; b");
/// ```
///
/// # Examples
///
/// ```
/// use multicause::{Failure, merge};
///
/// let one: Failure<&str> = Failure::from("timeout");
/// assert!(one.is_single());
/// assert_eq!(one.to_string(), "timeout");
///
/// let two = merge(Some(one), Some(Failure::from("refused"))).unwrap();
/// assert_eq!(two.len(), 2);
/// assert_eq!(two.errors(), &["timeout", "refused"]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Failure<E> {
    /// Exactly one failure, stored as it was recorded.
    Single(E),
    /// Two or more failures.
    Aggregate(AggregateError<E>),
}

impl<E> Failure<E> {
    /// Collapses a flattened sequence: nothing, one error, or an aggregate.
    pub(crate) fn from_flattened(mut errors: Vec<E>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop().map(Failure::Single),
            _ => Some(Failure::Aggregate(AggregateError::from_flattened(errors))),
        }
    }

    /// Returns the number of underlying failures.
    ///
    /// This is `1` for [`Failure::Single`] and the number of constituents
    /// for [`Failure::Aggregate`]; it is never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Failure::Single(_) => 1,
            Failure::Aggregate(aggregate) => aggregate.len(),
        }
    }

    /// Returns `true` if this holds exactly one failure.
    pub fn is_single(&self) -> bool {
        matches!(self, Failure::Single(_))
    }

    /// Returns `true` if this holds two or more failures.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Failure::Aggregate(_))
    }

    /// Returns the underlying failures in recording order.
    ///
    /// A single failure is returned as a one-element slice. The slice is a
    /// shared borrow, so nothing can modify the failures while it is alive.
    pub fn errors(&self) -> &[E] {
        match self {
            Failure::Single(error) => slice::from_ref(error),
            Failure::Aggregate(aggregate) => aggregate.as_slice(),
        }
    }

    /// Returns an iterator over references to the underlying failures.
    pub fn iter(&self) -> Iter<'_, E> {
        Iter::new(self.errors())
    }

    /// Returns the aggregate, if this holds more than one failure.
    pub fn as_aggregate(&self) -> Option<&AggregateError<E>> {
        match self {
            Failure::Single(_) => None,
            Failure::Aggregate(aggregate) => Some(aggregate),
        }
    }

    /// Returns the original error if this holds exactly one failure, or the
    /// aggregate otherwise.
    pub fn into_single(self) -> Result<E, AggregateError<E>> {
        match self {
            Failure::Single(error) => Ok(error),
            Failure::Aggregate(aggregate) => Err(aggregate),
        }
    }

    /// Returns the aggregate if this holds more than one failure, or the
    /// original error otherwise.
    pub fn into_aggregate(self) -> Result<AggregateError<E>, E> {
        match self {
            Failure::Single(error) => Err(error),
            Failure::Aggregate(aggregate) => Ok(aggregate),
        }
    }

    /// Consumes the failure and returns the underlying failures in order.
    pub fn into_vec(self) -> Vec<E> {
        match self {
            Failure::Single(error) => vec![error],
            Failure::Aggregate(aggregate) => aggregate.into_vec(),
        }
    }

    /// Appends `next` after the failures held by `self`.
    ///
    /// The result always holds at least two failures. If `next` is an
    /// aggregate its constituents are spliced in order, so aggregates never
    /// nest.
    ///
    /// # Examples
    ///
    /// ```
    /// use multicause::Failure;
    ///
    /// let left = Failure::from("a").merge("b");
    /// let right = Failure::from("c").merge("d");
    /// let all = left.merge(right);
    /// assert_eq!(all.errors(), &["a", "b", "c", "d"]);
    /// ```
    #[must_use]
    pub fn merge<X>(self, next: X) -> Failure<E>
    where
        X: Into<Failure<E>>,
    {
        let next = next.into();
        let mut errors = self.into_vec();
        errors.reserve(next.len());
        errors.extend(next);
        Failure::Aggregate(AggregateError::from_flattened(errors))
    }

    /// Transforms every underlying failure, keeping the shape and the order.
    ///
    /// # Examples
    ///
    /// ```
    /// use multicause::{BoxError, Failure};
    ///
    /// let failure: Failure<std::fmt::Error> = Failure::from(std::fmt::Error);
    /// let erased: Failure<BoxError> = failure.map(BoxError::from);
    /// assert_eq!(erased.to_string(), "an error occurred when formatting an argument");
    /// ```
    pub fn map<F, M>(self, mut f: M) -> Failure<F>
    where
        M: FnMut(E) -> F,
    {
        match self {
            Failure::Single(error) => Failure::Single(f(error)),
            Failure::Aggregate(aggregate) => Failure::Aggregate(aggregate.map(f)),
        }
    }
}

impl Failure<BoxError> {
    /// Converts a boxed error into a failure, flattening aggregates hidden
    /// behind the box.
    ///
    /// If `error` is a boxed [`AggregateError<BoxError>`] its constituents are
    /// recovered, recursively, so failures that went through type erasure
    /// still merge without nesting. Any other error becomes
    /// [`Failure::Single`].
    ///
    /// The generic entry points (`From`, [`Collector::push`](crate::Collector::push),
    /// [`combine`](crate::combine), ...) cannot look behind the box. Use this,
    /// [`Collector::push_boxed`](crate::Collector::push_boxed),
    /// [`combine_boxed`](crate::combine_boxed) or
    /// [`append_boxed_into`](crate::append_boxed_into) for errors that may be
    /// erased aggregates.
    ///
    /// # Examples
    ///
    /// ```
    /// use multicause::{BoxError, Failure};
    ///
    /// let inner: Failure<BoxError> = Failure::from(BoxError::from("a")).merge(BoxError::from("b"));
    /// let erased: BoxError = inner.into_boxed();
    ///
    /// let outer = Failure::from(BoxError::from("c")).merge(Failure::from_boxed(erased));
    /// assert_eq!(outer.len(), 3);
    /// assert_eq!(outer.to_string(), "c; a; b");
    /// ```
    pub fn from_boxed(error: BoxError) -> Self {
        match error.downcast::<AggregateError<BoxError>>() {
            Ok(aggregate) => Failure::Aggregate(splice_all(*aggregate)),
            Err(error) => Failure::Single(error),
        }
    }

    /// Splices every erased aggregate among the underlying failures.
    ///
    /// Repairs a failure built by passing boxed aggregates through the
    /// generic entry points. Order is preserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use multicause::{BoxError, Failure};
    ///
    /// let inner = Failure::from(BoxError::from("a")).merge(BoxError::from("b"));
    /// let nested = Failure::from(BoxError::from("c")).merge(inner.into_boxed());
    /// assert_eq!(nested.len(), 2);
    ///
    /// let flat = nested.flatten_boxed();
    /// assert_eq!(flat.len(), 3);
    /// assert_eq!(flat.to_string(), "c; a; b");
    /// ```
    #[must_use]
    pub fn flatten_boxed(self) -> Self {
        match self {
            Failure::Single(error) => Failure::from_boxed(error),
            Failure::Aggregate(aggregate) => Failure::Aggregate(splice_all(aggregate)),
        }
    }

    /// Erases the failure into a [`BoxError`].
    ///
    /// A single failure is returned as-is; an aggregate is boxed so that
    /// [`from_boxed`](Self::from_boxed) can recover its constituents later.
    pub fn into_boxed(self) -> BoxError {
        match self {
            Failure::Single(error) => error,
            Failure::Aggregate(aggregate) => Box::new(aggregate),
        }
    }
}

/// Rebuilds `aggregate` with every boxed aggregate constituent spliced in.
///
/// Each constituent contributes at least one error, so the result still
/// holds at least two.
fn splice_all(aggregate: AggregateError<BoxError>) -> AggregateError<BoxError> {
    if !aggregate
        .iter()
        .any(|error| error.is::<AggregateError<BoxError>>())
    {
        return aggregate;
    }

    let mut errors = Vec::with_capacity(aggregate.len());
    for error in aggregate {
        splice(error, &mut errors);
    }
    AggregateError::from_flattened(errors)
}

fn splice(error: BoxError, errors: &mut Vec<BoxError>) {
    match error.downcast::<AggregateError<BoxError>>() {
        Ok(aggregate) => {
            for inner in *aggregate {
                splice(inner, errors);
            }
        }
        Err(error) => errors.push(error),
    }
}

impl<E> From<E> for Failure<E> {
    fn from(error: E) -> Self {
        Failure::Single(error)
    }
}

impl<E> From<AggregateError<E>> for Failure<E> {
    fn from(aggregate: AggregateError<E>) -> Self {
        Failure::Aggregate(aggregate)
    }
}

impl<E> AsRef<[E]> for Failure<E> {
    fn as_ref(&self) -> &[E] {
        self.errors()
    }
}

impl<E> IntoIterator for Failure<E> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Failure::Single(error) => IntoIter::new(vec![error]),
            Failure::Aggregate(aggregate) => aggregate.into_iter(),
        }
    }
}

impl<'a, E> IntoIterator for &'a Failure<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E> fmt::Display for Failure<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Single(error) => fmt::Display::fmt(error, f),
            Failure::Aggregate(aggregate) => fmt::Display::fmt(aggregate, f),
        }
    }
}

impl<E> fmt::Debug for Failure<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Single(error) => fmt::Debug::fmt(error, f),
            Failure::Aggregate(aggregate) => fmt::Debug::fmt(aggregate, f),
        }
    }
}

impl<E> core::error::Error for Failure<E>
where
    E: core::error::Error,
{
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Failure::Single(error) => error.source(),
            Failure::Aggregate(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{
        format,
        string::{String, ToString},
    };

    use super::*;

    #[derive(Debug)]
    struct Wrapped(fmt::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("wrapped")
        }
    }

    impl core::error::Error for Wrapped {
        fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_failure_send_sync() {
        static_assertions::assert_impl_all!(Failure<String>: Send, Sync, Clone);
        static_assertions::assert_impl_all!(Failure<BoxError>: Send, Sync);
        static_assertions::assert_not_impl_any!(Failure<BoxError>: Clone);
        static_assertions::assert_not_impl_any!(Failure<u8>: Copy);
    }

    #[test]
    fn test_error_impl_follows_element() {
        static_assertions::assert_impl_all!(Failure<fmt::Error>: core::error::Error);
        static_assertions::assert_not_impl_any!(Failure<BoxError>: core::error::Error);
        static_assertions::assert_not_impl_any!(Failure<&'static str>: core::error::Error);
        static_assertions::assert_impl_all!(AggregateError<BoxError>: core::error::Error);
        static_assertions::assert_impl_all!(AggregateError<&'static str>: core::error::Error);
    }

    #[test]
    fn test_from_flattened_collapses() {
        assert_eq!(Failure::<u8>::from_flattened(Vec::new()), None);
        assert_eq!(Failure::from_flattened(vec![7u8]), Some(Failure::Single(7)));

        let many = Failure::from_flattened(vec![1u8, 2]).unwrap();
        assert!(many.is_aggregate());
        assert_eq!(many.errors(), &[1, 2]);
    }

    #[test]
    fn test_merge_splices_both_sides() {
        let left = Failure::from(1u8).merge(2u8);
        let right = Failure::from(3u8).merge(4u8);
        let merged = left.merge(right);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.into_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_single_is_transparent() {
        let failure = Failure::from(Wrapped(fmt::Error));
        assert_eq!(failure.to_string(), "wrapped");
        assert_eq!(format!("{failure:?}"), "Wrapped(Error)");
        assert!(core::error::Error::source(&failure).is_some());

        let Ok(original) = failure.into_single() else {
            panic!("expected a single failure");
        };
        assert_eq!(original.to_string(), "wrapped");
    }

    #[test]
    fn test_aggregate_has_no_source() {
        let failure = Failure::from(Wrapped(fmt::Error)).merge(Wrapped(fmt::Error));
        assert!(core::error::Error::source(&failure).is_none());
        assert_eq!(failure.to_string(), "wrapped; wrapped");
    }

    #[test]
    fn test_map_keeps_shape() {
        let single = Failure::from(2u32).map(|code| code + 1);
        assert_eq!(single, Failure::Single(3));

        let many = Failure::from(2u32).merge(5u32).map(|code| code * 2);
        assert_eq!(many.errors(), &[4, 10]);
    }

    #[test]
    fn test_boxed_round_trip_flattens() {
        let aggregate = Failure::from(BoxError::from("a")).merge(BoxError::from("b"));
        let boxed = aggregate.into_boxed();

        let recovered = Failure::from_boxed(boxed);
        assert_eq!(recovered.len(), 2);
        assert_eq!(recovered.to_string(), "a; b");

        let single = Failure::from_boxed(BoxError::from("plain"));
        assert!(single.is_single());
        assert_eq!(single.into_boxed().to_string(), "plain");
    }

    #[test]
    fn test_boxed_nested_aggregates_are_spliced() {
        let inner = Failure::from(BoxError::from("b")).merge(BoxError::from("c"));
        let middle = Failure::from(BoxError::from("a")).merge(inner.into_boxed());
        assert_eq!(middle.len(), 2);

        let recovered = Failure::from_boxed(middle.into_boxed());
        assert_eq!(recovered.len(), 3);
        assert_eq!(recovered.to_string(), "a; b; c");
        assert!(recovered.iter().all(|error| !error.is::<AggregateError<BoxError>>()));
    }

    #[test]
    fn test_flatten_boxed_without_aggregates_is_unchanged() {
        let failure = Failure::from(BoxError::from("a")).merge(BoxError::from("b"));
        let flat = failure.flatten_boxed();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat.to_string(), "a; b");

        let single = Failure::from(BoxError::from("only")).flatten_boxed();
        assert!(single.is_single());
    }
}
