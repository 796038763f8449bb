use alloc::vec;
use core::{iter::FusedIterator, slice};

/// An iterator over references to the constituents of a failure.
///
/// Created by [`AggregateError::iter`] and [`Failure::iter`].
///
/// # Examples
///
/// ```
/// use multicause::{Failure, combine};
///
/// let failure: Failure<&str> = combine([Some("first"), Some("second")]).unwrap();
/// let messages: Vec<&str> = failure.iter().copied().collect();
/// assert_eq!(messages, ["first", "second"]);
/// ```
///
/// [`AggregateError::iter`]: crate::AggregateError::iter
/// [`Failure::iter`]: crate::Failure::iter
#[must_use]
pub struct Iter<'a, E> {
    inner: slice::Iter<'a, E>,
}

impl<E> Clone for Iter<'_, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, E> Iter<'a, E> {
    pub(crate) fn new(errors: &'a [E]) -> Self {
        Self {
            inner: errors.iter(),
        }
    }

    /// Returns the constituents that have not been yielded yet.
    pub fn as_slice(&self) -> &'a [E] {
        self.inner.as_slice()
    }
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E> DoubleEndedIterator for Iter<'_, E> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<E> ExactSizeIterator for Iter<'_, E> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<E> FusedIterator for Iter<'_, E> {}

impl<E> core::fmt::Debug for Iter<'_, E>
where
    E: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Iter").field(&self.as_slice()).finish()
    }
}

/// An owning iterator over the constituents of a failure.
///
/// Created by the [`IntoIterator`] implementations of [`AggregateError`] and
/// [`Failure`].
///
/// [`AggregateError`]: crate::AggregateError
/// [`Failure`]: crate::Failure
#[must_use]
pub struct IntoIter<E> {
    inner: vec::IntoIter<E>,
}

impl<E> IntoIter<E> {
    pub(crate) fn new(errors: alloc::vec::Vec<E>) -> Self {
        Self {
            inner: errors.into_iter(),
        }
    }

    /// Returns the constituents that have not been yielded yet.
    pub fn as_slice(&self) -> &[E] {
        self.inner.as_slice()
    }
}

impl<E> Iterator for IntoIter<E> {
    type Item = E;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E> DoubleEndedIterator for IntoIter<E> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<E> ExactSizeIterator for IntoIter<E> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<E> FusedIterator for IntoIter<E> {}

impl<E> core::fmt::Debug for IntoIter<E>
where
    E: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
