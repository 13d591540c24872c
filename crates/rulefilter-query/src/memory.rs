//! In-memory query adapter
//!
//! Wraps any `IntoIterator` and filters it through a compiled predicate.
//! The filter is lazy: no element is touched until the caller iterates the
//! result.

use rulefilter_compiler::Predicate;
use std::sync::Arc;

/// An in-memory queryable source
pub struct MemorySource<I> {
    inner: I,
}

impl<T, I> MemorySource<I>
where
    I: IntoIterator<Item = T>,
{
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Apply a compiled predicate, returning a lazy filtering iterator
    pub fn apply(self, predicate: Arc<Predicate<T>>) -> Filtered<I::IntoIter, T> {
        Filtered {
            iter: self.inner.into_iter(),
            predicate,
        }
    }
}

/// Lazy iterator over the records a predicate selects
pub struct Filtered<It, T> {
    iter: It,
    predicate: Arc<Predicate<T>>,
}

impl<T, It> Iterator for Filtered<It, T>
where
    It: Iterator<Item = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.iter.find(|record| self.predicate.eval(record))
    }
}
