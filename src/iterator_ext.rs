use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::{Collector, Failure};

/// Extension methods for iterators over `Result` types to collect every
/// failure.
///
/// [`Iterator::collect`] into a `Result` stops at the first error. These
/// methods keep consuming the iterator and merge every error into a single
/// [`Failure`], so a batch of validations or cleanups reports all of its
/// problems at once.
///
/// ```rust
/// use multicause::prelude::*;
///
/// let inputs = vec!["1", "2", "invalid", "4", "bad"];
///
/// // Standard collect stops at the first error
/// let standard: Result<Vec<u8>, _> = inputs.iter().map(|s| s.parse::<u8>()).collect();
/// assert!(standard.is_err());
///
/// // collect_failures_vec sees both "invalid" and "bad"
/// let result: Result<Vec<u8>, Failure<std::num::ParseIntError>> = inputs
///     .into_iter()
///     .map(|s| s.parse::<u8>())
///     .collect_failures_vec();
///
/// assert_eq!(result.unwrap_err().len(), 2);
/// ```
pub trait IteratorExt<A, E>: Sized + Iterator<Item = Result<A, E>> {
    /// Collects successful values into a container, or every error into a
    /// [`Failure`].
    ///
    /// The whole iterator is consumed even after the first error. If no item
    /// failed the container is returned; otherwise the successful values are
    /// dropped and the errors are returned in iteration order. A single error
    /// is returned as [`Failure::Single`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeSet;
    ///
    /// use multicause::prelude::*;
    ///
    /// let values: Result<BTreeSet<u8>, Failure<std::num::ParseIntError>> =
    ///     ["1", "2", "2"].into_iter().map(|s| s.parse::<u8>()).collect_failures();
    /// assert_eq!(values.unwrap(), BTreeSet::from([1, 2]));
    /// ```
    fn collect_failures<Container>(self) -> Result<Container, Failure<E>>
    where
        Container: FromIterator<A>;

    /// Collects successful values into a `Vec`, or every error into a
    /// [`Failure`].
    ///
    /// A specialized version of
    /// [`collect_failures`](IteratorExt::collect_failures) that can be easier
    /// on type inference.
    fn collect_failures_vec(self) -> Result<Vec<A>, Failure<E>>;
}

/// Yields successful values until the first error, then drains the rest of
/// the inner iterator into `failures`.
struct UntilFailure<'a, Iter, E> {
    iter: Iter,
    failures: &'a mut Option<Collector<E>>,
}

impl<Iter, A, E> Iterator for UntilFailure<'_, Iter, E>
where
    Iter: Iterator<Item = Result<A, E>>,
{
    type Item = A;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.failures.is_some() {
            return None;
        }

        match self.iter.next() {
            Some(Ok(value)) => Some(value),
            Some(Err(error)) => {
                let failures = core::iter::once(error)
                    .chain((&mut self.iter).filter_map(Result::err))
                    .collect();
                *self.failures = Some(failures);
                None
            }
            None => None,
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failures.is_some() {
            (0, Some(0))
        } else {
            let (_, upper) = self.iter.size_hint();
            (0, upper)
        }
    }
}

impl<Iter, A, E> FusedIterator for UntilFailure<'_, Iter, E> where
    Iter: FusedIterator<Item = Result<A, E>>
{
}

impl<A, E, I> IteratorExt<A, E> for I
where
    I: Iterator<Item = Result<A, E>>,
{
    #[inline]
    fn collect_failures<Container>(self) -> Result<Container, Failure<E>>
    where
        Container: FromIterator<A>,
    {
        let mut failures = None;
        let values = Container::from_iter(UntilFailure {
            iter: self,
            failures: &mut failures,
        });
        match failures.and_then(Collector::into_result) {
            Some(failure) => Err(failure),
            None => Ok(values),
        }
    }

    #[inline]
    fn collect_failures_vec(mut self) -> Result<Vec<A>, Failure<E>> {
        let mut values = Vec::new();
        while let Some(item) = self.next() {
            match item {
                Ok(value) => values.push(value),
                Err(error) => {
                    drop(values);
                    let mut failures: Collector<E> = Collector::new();
                    failures.push(error);
                    failures.extend(self.filter_map(Result::err));
                    return failures.finish().map(|()| Vec::new());
                }
            }
        }
        Ok(values)
    }
}
