//! Closure-based predicate combinators.

use std::fmt;
use std::sync::Arc;

/// A shareable boolean test over records.
///
/// Predicates compose with [`and`](Predicate::and), [`or`](Predicate::or) and
/// [`not`](Predicate::not); each combinator returns a new predicate and leaves
/// its inputs untouched. Cloning is a reference-count bump.
///
/// ```
/// use quarry::Predicate;
///
/// let even = Predicate::new(|n: &i32| n % 2 == 0);
/// let big = Predicate::new(|n: &i32| *n > 10);
///
/// let test = even.clone().and(big.not());
/// assert!(test.test(&4));
/// assert!(!test.test(&12));
/// ```
pub struct Predicate<T> {
    test: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: 'static> Predicate<T> {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Predicate {
            test: Arc::new(test),
        }
    }

    /// Matches every record.
    pub fn always() -> Self {
        Predicate::new(|_| true)
    }

    /// Matches when both predicates match. `other` is not evaluated when
    /// `self` fails.
    pub fn and(self, other: Predicate<T>) -> Self {
        Predicate::new(move |item| self.test(item) && other.test(item))
    }

    /// Matches when either predicate matches. `other` is not evaluated when
    /// `self` succeeds.
    pub fn or(self, other: Predicate<T>) -> Self {
        Predicate::new(move |item| self.test(item) || other.test(item))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Predicate::new(move |item| !self.test(item))
    }

    /// OR-combines a set of predicates. Returns `None` for an empty set.
    pub fn any_of<I>(predicates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Predicate<T>>,
    {
        predicates.into_iter().reduce(Predicate::or)
    }
}

impl<T> Predicate<T> {
    pub fn test(&self, item: &T) -> bool {
        (self.test)(item)
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Predicate {
            test: Arc::clone(&self.test),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn and_or_not() {
        let positive = Predicate::new(|n: &i64| *n > 0);
        let small = Predicate::new(|n: &i64| *n < 10);

        let both = positive.clone().and(small.clone());
        assert!(both.test(&5));
        assert!(!both.test(&15));
        assert!(!both.test(&-1));

        let either = positive.clone().or(small);
        assert!(either.test(&-1));
        assert!(either.test(&15));

        assert!(positive.not().test(&-3));
    }

    #[test]
    fn and_short_circuits() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let never = Predicate::new(|_: &u8| false);
        let counted = Predicate::new(|_: &u8| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            true
        });

        assert!(!never.and(counted).test(&0));
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn any_of_empty_is_none() {
        assert!(Predicate::<u8>::any_of(Vec::new()).is_none());

        let any = Predicate::any_of(vec![
            Predicate::new(|n: &u8| *n == 1),
            Predicate::new(|n: &u8| *n == 2),
        ])
        .unwrap();
        assert!(any.test(&2));
        assert!(!any.test(&3));
    }

    #[test]
    fn always_matches() {
        assert!(Predicate::<()>::always().test(&()));
    }
}
