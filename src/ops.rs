//! Free functions for callers that keep their own `Option<Failure<E>>`.

use alloc::vec::Vec;

use crate::{BoxError, Failure};

/// Merges two failure states into one.
///
/// - If `next` is `None`, `current` is returned unchanged.
/// - If `current` is `None`, `next` is returned unchanged; an aggregate is
///   reused as-is.
/// - Otherwise the failures of `current` are followed by those of `next`.
///   Aggregates on either side are spliced, never nested.
///
/// No failure is ever dropped, deduplicated or reordered.
///
/// # Examples
///
/// ```
/// use multicause::{Failure, extract, merge};
///
/// let a = Some(Failure::from("a"));
/// let b = Some(Failure::from("b"));
///
/// assert_eq!(merge(None::<Failure<&str>>, None), None);
/// assert_eq!(merge(a.clone(), None), a);
///
/// let both = merge(a, b);
/// assert_eq!(extract(both.as_ref()), &["a", "b"]);
/// ```
#[must_use]
pub fn merge<E>(current: Option<Failure<E>>, next: Option<Failure<E>>) -> Option<Failure<E>> {
    match (current, next) {
        (current, None) => current,
        (None, next) => next,
        (Some(current), Some(next)) => Some(current.merge(next)),
    }
}

/// Merges a sequence of optional failures, left to right.
///
/// The result is the same as folding [`merge`] over the sequence starting
/// from `None`, but the failures are flattened in a single pass:
/// - no inputs, or only `None` inputs, give `None`,
/// - exactly one failure is returned unchanged,
/// - two or more give an aggregate with every failure in input order.
///
/// Each item may be a bare error, a [`Failure`] or an
/// [`AggregateError`](crate::AggregateError).
///
/// # Examples
///
/// ```
/// use multicause::{Failure, combine};
///
/// let none: Option<Failure<&str>> = combine([None::<&str>, None, None]);
/// assert_eq!(none, None);
///
/// let one: Option<Failure<&str>> = combine([None, Some("only"), None]);
/// assert_eq!(one, Some(Failure::Single("only")));
///
/// let many: Option<Failure<&str>> = combine([Some("a"), None, Some("b")]);
/// assert_eq!(many.unwrap().errors(), &["a", "b"]);
/// ```
#[must_use]
pub fn combine<E, X, I>(errors: I) -> Option<Failure<E>>
where
    I: IntoIterator<Item = Option<X>>,
    X: Into<Failure<E>>,
{
    let mut failures = errors.into_iter().flatten().map(Into::into);

    let first = failures.next()?;
    let Some(second) = failures.next() else {
        return Some(first);
    };

    let mut flattened: Vec<E> = first.into_vec();
    flattened.extend(second);
    for failure in failures {
        flattened.extend(failure);
    }
    Failure::from_flattened(flattened)
}

/// Returns the failures held by `error`, in recording order.
///
/// `None` gives an empty slice, a single failure a one-element slice, and an
/// aggregate its constituents. The slice borrows from `error`, so it cannot
/// be changed by a later merge while it is in use.
///
/// # Examples
///
/// ```
/// use multicause::{Failure, extract};
///
/// assert!(extract::<&str>(None).is_empty());
/// assert_eq!(extract(Some(&Failure::from("a"))), &["a"]);
/// ```
pub fn extract<E>(error: Option<&Failure<E>>) -> &[E] {
    match error {
        Some(failure) => failure.errors(),
        None => &[],
    }
}

/// Merges `next` into the failure state held by `slot`.
///
/// Equivalent to `*slot = merge(slot.take(), next)`. Returns `true` if `next`
/// held a failure; `slot` is left untouched otherwise.
///
/// This is handy for accumulating failures in cleanup code that already has
/// an `Option<Failure<E>>` to return.
///
/// # Examples
///
/// ```
/// use multicause::{Failure, append_into};
///
/// let mut failure: Option<Failure<&str>> = None;
/// assert!(!append_into(&mut failure, None::<&str>));
/// assert!(append_into(&mut failure, Some("flush failed")));
/// assert!(append_into(&mut failure, Some("close failed")));
///
/// assert_eq!(failure.unwrap().to_string(), "flush failed; close failed");
/// ```
pub fn append_into<E, X>(slot: &mut Option<Failure<E>>, next: Option<X>) -> bool
where
    X: Into<Failure<E>>,
{
    let Some(next) = next else {
        return false;
    };
    let next = next.into();
    *slot = Some(match slot.take() {
        Some(current) => current.merge(next),
        None => next,
    });
    true
}

/// Calls `f` and merges its error, if any, into `slot`.
///
/// Returns the success value of `f`, or `None` if it failed. A panic inside
/// `f` is not caught: it unwinds through this function and `slot` keeps its
/// previous value.
///
/// # Examples
///
/// ```
/// use multicause::{Failure, append_func_into};
///
/// fn close(name: &'static str) -> Result<(), &'static str> {
///     if name == "locked" { Err("locked file") } else { Ok(()) }
/// }
///
/// let mut failure: Option<Failure<&str>> = None;
/// assert_eq!(append_func_into(&mut failure, || close("free")), Some(()));
/// assert_eq!(append_func_into(&mut failure, || close("locked")), None);
/// assert_eq!(failure, Some(Failure::Single("locked file")));
/// ```
pub fn append_func_into<E, T, X, F>(slot: &mut Option<Failure<E>>, f: F) -> Option<T>
where
    F: FnOnce() -> Result<T, X>,
    X: Into<Failure<E>>,
{
    match f() {
        Ok(value) => Some(value),
        Err(error) => {
            append_into(slot, Some(error));
            None
        }
    }
}

/// Like [`combine`], but splices boxed errors that are erased aggregates.
///
/// # Examples
///
/// ```
/// use multicause::{BoxError, Failure, combine_boxed};
///
/// let inner = Failure::from(BoxError::from("a")).merge(BoxError::from("b"));
/// let combined = combine_boxed([Some(BoxError::from("c")), None, Some(inner.into_boxed())]);
/// assert_eq!(combined.unwrap().len(), 3);
/// ```
#[must_use]
pub fn combine_boxed<I>(errors: I) -> Option<Failure<BoxError>>
where
    I: IntoIterator<Item = Option<BoxError>>,
{
    combine(
        errors
            .into_iter()
            .map(|error| error.map(Failure::from_boxed)),
    )
}

/// Like [`append_into`], but splices `next` if it is an erased aggregate.
pub fn append_boxed_into(slot: &mut Option<Failure<BoxError>>, next: Option<BoxError>) -> bool {
    append_into(slot, next.map(Failure::from_boxed))
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::AggregateError;

    fn aggregate(errors: &[u8]) -> Failure<u8> {
        Failure::Aggregate(AggregateError::from_flattened(errors.to_vec()))
    }

    #[test]
    fn test_merge_identities() {
        assert_eq!(merge::<u8>(None, None), None);
        assert_eq!(merge(None, Some(Failure::Single(1u8))), Some(Failure::Single(1)));
        assert_eq!(merge(Some(Failure::Single(1u8)), None), Some(Failure::Single(1)));
        assert_eq!(merge(None, Some(aggregate(&[1, 2]))), Some(aggregate(&[1, 2])));
    }

    #[test]
    fn test_merge_is_associative_when_flattened() {
        let a = || Some(aggregate(&[1, 2]));
        let b = || Some(Failure::Single(3u8));
        let c = || Some(aggregate(&[4, 5]));

        let left = merge(merge(a(), b()), c());
        let right = merge(a(), merge(b(), c()));
        assert_eq!(extract(left.as_ref()), extract(right.as_ref()));
        assert_eq!(extract(left.as_ref()), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_combine_reuses_single_aggregate() {
        let combined: Option<Failure<u8>> = combine([None, Some(aggregate(&[1, 2])), None]);
        assert_eq!(combined, Some(aggregate(&[1, 2])));
    }

    #[test]
    fn test_combine_flattens_mixed_inputs() {
        let combined: Option<Failure<u8>> = combine(vec![
            Some(Failure::Single(1u8)),
            Some(aggregate(&[2, 3])),
            None,
            Some(Failure::Single(4)),
        ]);
        assert_eq!(extract(combined.as_ref()), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_combine_empty() {
        assert_eq!(combine::<u8, u8, _>([]), None);
    }

    #[test]
    fn test_append_into_leaves_slot_on_none() {
        let mut slot = Some(Failure::Single(1u8));
        assert!(!append_into(&mut slot, None::<u8>));
        assert_eq!(slot, Some(Failure::Single(1)));
    }

    #[test]
    fn test_append_into_flattens_aggregate() {
        let mut slot = Some(Failure::Single(1u8));
        assert!(append_into(&mut slot, Some(aggregate(&[2, 3]))));
        assert_eq!(slot, Some(aggregate(&[1, 2, 3])));
    }

    #[test]
    fn test_append_func_into_returns_value() {
        let mut slot: Option<Failure<u8>> = None;
        assert_eq!(append_func_into(&mut slot, || Ok::<_, u8>(42)), Some(42));
        assert_eq!(slot, None);
        assert_eq!(append_func_into(&mut slot, || Err::<(), _>(7u8)), None);
        assert_eq!(slot, Some(Failure::Single(7)));
    }

    #[test]
    fn test_boxed_variants_splice_erased_aggregates() {
        let erased = || {
            Failure::from(BoxError::from("a"))
                .merge(BoxError::from("b"))
                .into_boxed()
        };

        let combined = combine_boxed([Some(BoxError::from("x")), None, Some(erased())]);
        assert_eq!(combined.map(|failure| failure.len()), Some(3));

        let mut slot = None;
        assert!(append_boxed_into(&mut slot, Some(erased())));
        assert!(!append_boxed_into(&mut slot, None));
        assert!(append_boxed_into(&mut slot, Some(BoxError::from("c"))));
        assert_eq!(extract(slot.as_ref()).len(), 3);
    }
}
