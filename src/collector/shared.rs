#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

use core::fmt;

use crate::{BoxError, Collector, Failure};

/// A [`Collector`] that can be appended to through a shared reference.
///
/// Every method locks an internal read-write lock for the duration of the
/// call: `std::sync::RwLock` with the `std` feature, a spin lock otherwise.
/// Closures passed to [`append_func`](Self::append_func) run before the lock
/// is taken, so a slow or panicking closure never blocks other threads.
///
/// A panic while the lock is held cannot leave the collector in an invalid
/// state, so a poisoned lock is simply reused.
///
/// When the workers are joined anyway, giving each one its own [`Collector`]
/// and calling [`Collector::absorb`] afterwards needs no locking at all.
///
/// # Examples
///
/// ```
/// use multicause::SharedCollector;
///
/// let collector: SharedCollector<String> = SharedCollector::new();
/// std::thread::scope(|scope| {
///     for worker in 0..4 {
///         let collector = &collector;
///         scope.spawn(move || {
///             if worker % 2 == 1 {
///                 collector.push(format!("worker {worker} failed"));
///             }
///         });
///     }
/// });
///
/// assert_eq!(collector.len(), 2);
/// ```
pub struct SharedCollector<E> {
    inner: impl_::RwLock<Collector<E>>,
}

impl<E> SharedCollector<E> {
    /// Creates an empty shared collector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: impl_::RwLock::new(Collector::new()),
        }
    }

    #[inline]
    fn read(&self) -> impl_::RwLockReadGuard<'_, Collector<E>> {
        #[cfg(not(feature = "std"))]
        let guard = self.inner.read();

        #[cfg(feature = "std")]
        let guard = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        guard
    }

    #[inline]
    fn write(&self) -> impl_::RwLockWriteGuard<'_, Collector<E>> {
        #[cfg(not(feature = "std"))]
        let guard = self.inner.write();

        #[cfg(feature = "std")]
        let guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        guard
    }

    /// Records `error` if it is `Some`. See [`Collector::append`].
    pub fn append<X>(&self, error: Option<X>)
    where
        X: Into<Failure<E>>,
    {
        if let Some(error) = error {
            self.write().push(error);
        }
    }

    /// Records `error`. See [`Collector::push`].
    pub fn push<X>(&self, error: X)
    where
        X: Into<Failure<E>>,
    {
        self.write().push(error);
    }

    /// Records the error of `result`, if any, and returns its success value.
    pub fn append_result<T, X>(&self, result: Result<T, X>) -> Option<T>
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

    /// Calls `f` without holding the lock, then records its error, if any.
    pub fn append_func<T, X, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce() -> Result<T, X>,
        X: Into<Failure<E>>,
    {
        self.append_result(f())
    }

    /// Moves every failure of `other` after the failures already recorded.
    pub fn absorb(&self, other: Collector<E>) {
        if other.has_failures() {
            self.write().absorb(other);
        }
    }

    /// Returns a copy of the current state. See [`Collector::result`].
    #[must_use]
    pub fn result(&self) -> Option<Failure<E>>
    where
        E: Clone,
    {
        self.read().result()
    }

    /// Returns a copy of every recorded failure, in recording order.
    #[must_use]
    pub fn snapshot(&self) -> alloc::vec::Vec<E>
    where
        E: Clone,
    {
        self.read().snapshot().to_vec()
    }

    /// Returns the number of recorded failures.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns `true` if at least one failure has been recorded.
    pub fn has_failures(&self) -> bool {
        self.read().has_failures()
    }

    /// Returns the collector to the empty state.
    pub fn reset(&self) {
        self.write().reset();
    }

    /// Returns the collector to the empty state and hands back what it held.
    pub fn take(&self) -> Option<Failure<E>> {
        self.write().take()
    }

    /// Gives direct access to the collector, without locking.
    pub fn get_mut(&mut self) -> &mut Collector<E> {
        #[cfg(not(feature = "std"))]
        let collector = self.inner.get_mut();

        #[cfg(feature = "std")]
        let collector = self
            .inner
            .get_mut()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        collector
    }

    /// Consumes the shared collector and returns the inner one.
    pub fn into_inner(self) -> Collector<E> {
        #[cfg(not(feature = "std"))]
        let collector = self.inner.into_inner();

        #[cfg(feature = "std")]
        let collector = self
            .inner
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        collector
    }
}

impl SharedCollector<BoxError> {
    /// Records a boxed error, splicing it if it is an erased aggregate. See
    /// [`Collector::push_boxed`].
    pub fn push_boxed(&self, error: BoxError) {
        let failure = Failure::from_boxed(error);
        self.write().push(failure);
    }
}

impl<E> Default for SharedCollector<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> From<Collector<E>> for SharedCollector<E> {
    fn from(collector: Collector<E>) -> Self {
        Self {
            inner: impl_::RwLock::new(collector),
        }
    }
}

impl<E> fmt::Debug for SharedCollector<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCollector")
            .field("failures", &self.read().snapshot())
            .finish()
    }
}
