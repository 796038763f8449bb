mod shared;

use core::fmt;

pub use self::shared::SharedCollector;
use crate::{BoxError, Failure, Iter, instrument::trace_event, ops};

/// Accumulates failures for one logical unit of work.
///
/// A collector starts empty. Every recorded failure is merged into its
/// current state with the same rules as [`merge`](crate::merge), so at any
/// time [`as_result`](Self::as_result) is `None`, the single recorded
/// failure, or an aggregate of every recorded failure in order.
///
/// Recording `None` (or an `Ok` result) leaves the collector unchanged.
/// [`reset`](Self::reset) returns it to the empty state; values obtained
/// earlier through [`result`](Self::result), [`take`](Self::take) or
/// [`into_result`](Self::into_result) are owned and unaffected.
///
/// All mutating methods take `&mut self`, so a collector always has a single
/// owner. See [`SharedCollector`] for appending from several threads.
///
/// # Examples
///
/// ```
/// use multicause::Collector;
///
/// let mut collector: Collector<&str> = Collector::new();
/// collector.push("first");
/// collector.append(None::<&str>);
/// collector.push("second");
///
/// assert_eq!(collector.len(), 2);
/// assert_eq!(collector.snapshot(), &["first", "second"]);
///
/// let result = collector.result();
/// collector.reset();
/// assert!(collector.as_result().is_none());
/// assert_eq!(result.unwrap().to_string(), "first; second");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Collector<E> {
    failure: Option<Failure<E>>,
}

impl<E> Collector<E> {
    /// Creates an empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self { failure: None }
    }

    /// Records `error` if it is `Some`; does nothing for `None`.
    ///
    /// The error may be a bare `E`, a [`Failure<E>`] or an
    /// [`AggregateError<E>`](crate::AggregateError); aggregates are spliced
    /// into the collected sequence.
    pub fn append<X>(&mut self, error: Option<X>)
    where
        X: Into<Failure<E>>,
    {
        if ops::append_into(&mut self.failure, error) {
            trace_event!(total = self.len(), "failure recorded");
        }
    }

    /// Records `error`.
    ///
    /// Shorthand for `append(Some(error))`.
    pub fn push<X>(&mut self, error: X)
    where
        X: Into<Failure<E>>,
    {
        self.append(Some(error));
    }

    /// Records the error of `result`, if any, and returns its success value.
    ///
    /// # Examples
    ///
    /// ```
    /// use multicause::Collector;
    ///
    /// let mut collector: Collector<std::num::ParseIntError> = Collector::new();
    /// let parsed: Vec<u8> = ["1", "x", "3"]
    ///     .into_iter()
    ///     .filter_map(|s| collector.append_result(s.parse::<u8>()))
    ///     .collect();
    ///
    /// assert_eq!(parsed, [1, 3]);
    /// assert_eq!(collector.len(), 1);
    /// ```
    pub fn append_result<T, X>(&mut self, result: Result<T, X>) -> Option<T>
    where
        X: Into<Failure<E>>,
    {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    /// Calls `f` and records its error, if any.
    ///
    /// Equivalent to `append_result(f())`. A panic inside `f` is not caught
    /// and leaves the collector unchanged.
    pub fn append_func<T, X, F>(&mut self, f: F) -> Option<T>
    where
        F: FnOnce() -> Result<T, X>,
        X: Into<Failure<E>>,
    {
        self.append_result(f())
    }

    /// Moves every failure of `other` after the failures already recorded.
    ///
    /// This is the fan-in step when each worker of a concurrent job used its
    /// own collector.
    pub fn absorb(&mut self, other: Collector<E>) {
        if let Some(failure) = other.failure {
            self.push(failure);
        }
    }

    /// Returns a copy of the current state.
    ///
    /// The copy is independent of the collector: later appends or a
    /// [`reset`](Self::reset) do not change it. Use
    /// [`as_result`](Self::as_result) to borrow the state without cloning.
    #[must_use]
    pub fn result(&self) -> Option<Failure<E>>
    where
        E: Clone,
    {
        self.failure.clone()
    }

    /// Borrows the current state.
    pub fn as_result(&self) -> Option<&Failure<E>> {
        self.failure.as_ref()
    }

    /// Consumes the collector and returns its state.
    #[must_use]
    pub fn into_result(self) -> Option<Failure<E>> {
        self.failure
    }

    /// Consumes the collector, returning `Ok(())` if nothing was recorded.
    ///
    /// # Examples
    ///
    /// ```
    /// use multicause::{Collector, Failure};
    ///
    /// fn cleanup(steps: &[Result<(), &'static str>]) -> Result<(), Failure<&'static str>> {
    ///     let mut collector = Collector::new();
    ///     for step in steps {
    ///         collector.append_result(*step);
    ///     }
    ///     collector.finish()
    /// }
    ///
    /// assert!(cleanup(&[Ok(()), Ok(())]).is_ok());
    /// assert_eq!(cleanup(&[Err("a"), Ok(()), Err("b")]).unwrap_err().len(), 2);
    /// ```
    pub fn finish(self) -> Result<(), Failure<E>> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    /// Returns the number of failures recorded since the collector was
    /// created or last reset.
    ///
    /// An appended aggregate counts once per constituent, so this is always
    /// equal to `snapshot().len()`.
    pub fn len(&self) -> usize {
        self.failure.as_ref().map_or(0, Failure::len)
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.failure.is_none()
    }

    /// Returns `true` if at least one failure has been recorded.
    pub fn has_failures(&self) -> bool {
        self.failure.is_some()
    }

    /// Returns every recorded failure, in recording order.
    ///
    /// The slice is empty for an empty collector.
    pub fn snapshot(&self) -> &[E] {
        ops::extract(self.failure.as_ref())
    }

    /// Returns an iterator over the recorded failures.
    pub fn iter(&self) -> Iter<'_, E> {
        Iter::new(self.snapshot())
    }

    /// Returns the collector to the empty state.
    pub fn reset(&mut self) {
        self.failure = None;
        trace_event!("collector reset");
    }

    /// Returns the collector to the empty state and hands back what it held.
    pub fn take(&mut self) -> Option<Failure<E>> {
        let failure = self.failure.take();
        trace_event!("collector reset");
        failure
    }
}

impl Collector<BoxError> {
    /// Records a boxed error, splicing it if it is an erased aggregate.
    ///
    /// [`push`](Self::push) stores any [`BoxError`] as one failure, even one
    /// produced by [`Failure::into_boxed`]. This goes through
    /// [`Failure::from_boxed`] first, so the collector stays flat.
    ///
    /// # Examples
    ///
    /// ```
    /// use multicause::{BoxError, Collector, Failure};
    ///
    /// let inner = Failure::from(BoxError::from("a")).merge(BoxError::from("b"));
    ///
    /// let mut collector: Collector<BoxError> = Collector::new();
    /// collector.push_boxed(BoxError::from("c"));
    /// collector.push_boxed(inner.into_boxed());
    /// assert_eq!(collector.len(), 3);
    /// ```
    pub fn push_boxed(&mut self, error: BoxError) {
        self.push(Failure::from_boxed(error));
    }

    /// Records a boxed error if it is `Some`. See
    /// [`push_boxed`](Self::push_boxed).
    pub fn append_boxed(&mut self, error: Option<BoxError>) {
        if let Some(error) = error {
            self.push_boxed(error);
        }
    }
}

impl<E> Default for Collector<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Extend<E> for Collector<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for error in iter {
            self.push(error);
        }
    }
}

impl<E> FromIterator<E> for Collector<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut collector = Collector::new();
        collector.extend(iter);
        collector
    }
}

impl<'a, E> IntoIterator for &'a Collector<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E> fmt::Debug for Collector<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("failures", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String, vec};

    use super::*;
    use crate::AggregateError;

    #[allow(dead_code)]
    struct NonSend(*const ());
    static_assertions::assert_not_impl_any!(NonSend: Send, Sync);

    #[test]
    fn test_collector_send_sync() {
        static_assertions::assert_impl_all!(Collector<String>: Send, Sync, Clone, Default);
        static_assertions::assert_impl_all!(Collector<crate::BoxError>: Send, Sync);
        static_assertions::assert_not_impl_any!(Collector<NonSend>: Send, Sync);
        static_assertions::assert_not_impl_any!(Collector<u8>: Copy);
    }

    #[test]
    fn test_empty_state() {
        let collector = Collector::<u8>::new();
        assert_eq!(collector.len(), 0);
        assert!(collector.is_empty());
        assert!(!collector.has_failures());
        assert!(collector.snapshot().is_empty());
        assert_eq!(collector.result(), None);
        assert_eq!(collector.finish(), Ok(()));
    }

    #[test]
    fn test_none_is_ignored() {
        let mut collector = Collector::<u8>::new();
        collector.append(None::<u8>);
        collector.append_result(Ok::<_, u8>(()));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_single_failure_is_not_wrapped() {
        let mut collector = Collector::<u8>::new();
        collector.push(9u8);
        assert_eq!(collector.as_result(), Some(&Failure::Single(9)));
    }

    #[test]
    fn test_appended_aggregate_counts_constituents() {
        let mut collector = Collector::<u8>::new();
        collector.push(1u8);
        collector.push(AggregateError::from_flattened(vec![2u8, 3]));
        assert_eq!(collector.len(), 3);
        assert_eq!(collector.len(), collector.snapshot().len());
        assert_eq!(collector.snapshot(), &[1, 2, 3]);
    }

    #[test]
    fn test_absorb_keeps_order() {
        let mut first: Collector<u8> = [1, 2].into_iter().collect();
        let second: Collector<u8> = [3].into_iter().collect();
        first.absorb(second);
        first.absorb(Collector::new());
        assert_eq!(first.snapshot(), &[1, 2, 3]);
    }

    #[test]
    fn test_take_resets() {
        let mut collector: Collector<u8> = [1, 2].into_iter().collect();
        let taken = collector.take();
        assert!(collector.is_empty());
        assert_eq!(extract_owned(taken), vec![1, 2]);
    }

    #[test]
    fn test_debug_lists_failures() {
        let collector: Collector<u8> = [4, 5].into_iter().collect();
        assert_eq!(format!("{collector:?}"), "Collector { failures: [4, 5] }");
    }

    #[test]
    fn test_push_boxed_splices_erased_aggregate() {
        let inner = Failure::from(BoxError::from("a")).merge(BoxError::from("b"));

        let mut collector: Collector<BoxError> = Collector::new();
        collector.push_boxed(BoxError::from("c"));
        collector.append_boxed(None);
        collector.append_boxed(Some(inner.into_boxed()));

        assert_eq!(collector.len(), 3);
        assert_eq!(collector.len(), collector.snapshot().len());
        assert!(
            collector
                .iter()
                .all(|error| !error.is::<AggregateError<BoxError>>())
        );
        assert_eq!(format!("{}", collector.as_result().unwrap()), "c; a; b");
    }

    fn extract_owned(failure: Option<Failure<u8>>) -> alloc::vec::Vec<u8> {
        failure.map(Failure::into_vec).unwrap_or_default()
    }
}
