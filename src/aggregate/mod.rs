mod format;
mod iter;

use alloc::vec::Vec;
use core::fmt;

pub use self::iter::{IntoIter, Iter};

/// Two or more failures, kept in the order they were recorded.
///
/// An `AggregateError` is only ever produced by merging failures (see
/// [`merge`](crate::merge), [`combine`](crate::combine) and
/// [`Collector`](crate::Collector)). The merge rules guarantee that:
/// - it always holds at least two constituents; zero failures are
///   represented by `None` and a single failure by
///   [`Failure::Single`](crate::Failure::Single),
/// - it never contains another `AggregateError`; merging an aggregate splices
///   its constituents in place.
///
/// The value is immutable: there is no way to obtain mutable access to the
/// constituents, and merging consumes its inputs to produce a new value.
///
/// # Formatting
///
/// The [`Display`](core::fmt::Display) implementation joins the constituents
/// with `"; "`. The alternate form (`{:#}`) writes one constituent per line:
///
/// ```
/// use multicause::{Failure, combine};
///
/// let failure: Failure<&str> = combine([Some("disk full"), Some("socket closed")]).unwrap();
/// assert_eq!(failure.to_string(), "disk full; socket closed");
/// assert_eq!(
///     format!("{failure:#}"),
///     "the following errors occurred:\n -  disk full\n -  socket closed",
/// );
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AggregateError<E> {
    errors: Vec<E>,
}

#[allow(clippy::len_without_is_empty)]
impl<E> AggregateError<E> {
    /// Wraps an already flattened sequence.
    ///
    /// Callers must have checked that `errors` holds at least two elements.
    pub(crate) fn from_flattened(errors: Vec<E>) -> Self {
        debug_assert!(
            errors.len() >= 2,
            "an aggregate needs at least two constituents"
        );
        Self { errors }
    }

    /// Returns the number of constituents. This is always at least two.
    ///
    /// # Examples
    ///
    /// ```
    /// use multicause::{Failure, combine};
    ///
    /// let failure: Failure<&str> = combine([Some("a"), None, Some("b")]).unwrap();
    /// assert_eq!(failure.as_aggregate().unwrap().len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the constituents as a read-only slice, in recording order.
    pub fn as_slice(&self) -> &[E] {
        &self.errors
    }

    /// Returns the constituent at `index`, or [`None`] if it is out of bounds.
    pub fn get(&self, index: usize) -> Option<&E> {
        self.errors.get(index)
    }

    /// Returns the first recorded constituent.
    pub fn first(&self) -> &E {
        &self.errors[0]
    }

    /// Returns the last recorded constituent.
    pub fn last(&self) -> &E {
        &self.errors[self.errors.len() - 1]
    }

    /// Returns an iterator over references to the constituents.
    pub fn iter(&self) -> Iter<'_, E> {
        Iter::new(&self.errors)
    }

    /// Consumes the aggregate and returns its constituents.
    pub fn into_vec(self) -> Vec<E> {
        self.errors
    }

    /// Transforms every constituent, keeping the order.
    ///
    /// This is mostly useful to erase the constituent type, for example to
    /// turn an `AggregateError<io::Error>` into an
    /// `AggregateError<BoxError>` before merging it with failures of other
    /// types.
    ///
    /// # Examples
    ///
    /// ```
    /// use multicause::{Failure, combine};
    ///
    /// let failure: Failure<u32> = combine([Some(1), Some(2)]).unwrap();
    /// let lengths = failure.into_aggregate().unwrap().map(|code| code * 10);
    /// assert_eq!(lengths.as_slice(), &[10, 20]);
    /// ```
    pub fn map<F, M>(self, f: M) -> AggregateError<F>
    where
        M: FnMut(E) -> F,
    {
        AggregateError::from_flattened(self.errors.into_iter().map(f).collect())
    }
}

impl<E> AsRef<[E]> for AggregateError<E> {
    fn as_ref(&self) -> &[E] {
        &self.errors
    }
}

impl<E> IntoIterator for AggregateError<E> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.errors)
    }
}

impl<'a, E> IntoIterator for &'a AggregateError<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E> fmt::Display for AggregateError<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            format::write_multiline(&self.errors, f)
        } else {
            format::write_joined(&self.errors, f)
        }
    }
}

impl<E> fmt::Debug for AggregateError<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AggregateError").field(&self.errors).finish()
    }
}

// An aggregate has no single cause, so `source` stays `None`. Only display
// and debug output are needed from the constituents, which keeps
// `AggregateError<BoxError>` an error type as well.
impl<E> core::error::Error for AggregateError<E> where E: fmt::Debug + fmt::Display {}

#[cfg(test)]
mod tests {
    use alloc::{
        format,
        string::{String, ToString},
        vec,
    };

    use super::*;

    #[allow(dead_code)]
    struct NonSend(*const ());
    static_assertions::assert_not_impl_any!(NonSend: Send, Sync);

    #[test]
    fn test_aggregate_send_sync() {
        static_assertions::assert_impl_all!(AggregateError<()>: Send, Sync);
        static_assertions::assert_impl_all!(AggregateError<String>: Send, Sync);
        static_assertions::assert_impl_all!(AggregateError<crate::BoxError>: Send, Sync);
        static_assertions::assert_not_impl_any!(AggregateError<NonSend>: Send, Sync);
    }

    #[test]
    fn test_aggregate_copy_clone() {
        static_assertions::assert_impl_all!(AggregateError<String>: Clone);
        static_assertions::assert_not_impl_any!(AggregateError<NonSend>: Clone);
        static_assertions::assert_not_impl_any!(AggregateError<()>: Copy);
    }

    #[test]
    fn test_aggregate_error_bounds() {
        static_assertions::assert_impl_all!(AggregateError<crate::BoxError>: core::error::Error);
        static_assertions::assert_impl_all!(AggregateError<&'static str>: core::error::Error);
        static_assertions::assert_not_impl_any!(AggregateError<()>: core::error::Error);
    }

    #[test]
    fn test_accessors() {
        let aggregate = AggregateError::from_flattened(vec!["a", "b", "c"]);
        assert_eq!(aggregate.len(), 3);
        assert_eq!(*aggregate.first(), "a");
        assert_eq!(*aggregate.last(), "c");
        assert_eq!(aggregate.get(1), Some(&"b"));
        assert_eq!(aggregate.get(3), None);
        assert_eq!(aggregate.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn test_display_joined() {
        let aggregate = AggregateError::from_flattened(vec!["first", "second"]);
        assert_eq!(aggregate.to_string(), "first; second");
    }

    #[test]
    fn test_display_multiline_indents_continuation_lines() {
        let aggregate = AggregateError::from_flattened(vec!["first\ndetail", "second"]);
        assert_eq!(
            format!("{aggregate:#}"),
            "the following errors occurred:\n -  first\n    detail\n -  second"
        );
    }

    #[test]
    fn test_debug() {
        let aggregate = AggregateError::from_flattened(vec![1, 2]);
        assert_eq!(format!("{aggregate:?}"), "AggregateError([1, 2])");
    }
}
