//! Immutable result snapshots.
//!
//! A `ResultSnapshot` is the ordered list of per-query results published to
//! listeners. Snapshots are never mutated in place: `replace_at` returns a new
//! snapshot, so a listener holding an older one keeps a consistent view.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

/// An ordered, shared, immutable list of query results.
pub struct ResultSnapshot<R> {
    results: Rc<[R]>,
}

impl<R> ResultSnapshot<R> {
    /// Creates a snapshot from a list of results.
    pub fn new(results: Vec<R>) -> Self {
        Self {
            results: Rc::from(results),
        }
    }

    /// Creates an empty snapshot.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Returns true if both snapshots share the same allocation.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.results, &b.results)
    }

    /// Returns the results as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[R] {
        &self.results
    }
}

impl<R: Clone> ResultSnapshot<R> {
    /// Returns a new snapshot with the result at `index` replaced.
    ///
    /// Out-of-range indices return an unchanged copy of this snapshot.
    pub fn replace_at(&self, index: usize, result: R) -> Self {
        if index >= self.results.len() {
            return self.clone();
        }
        let mut results = self.results.to_vec();
        results[index] = result;
        Self::new(results)
    }

    /// Copies the results into a `Vec`.
    pub fn to_vec(&self) -> Vec<R> {
        self.results.to_vec()
    }
}

impl<R> Clone for ResultSnapshot<R> {
    fn clone(&self) -> Self {
        Self {
            results: Rc::clone(&self.results),
        }
    }
}

impl<R> Default for ResultSnapshot<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R> Deref for ResultSnapshot<R> {
    type Target = [R];

    fn deref(&self) -> &[R] {
        &self.results
    }
}

impl<R> From<Vec<R>> for ResultSnapshot<R> {
    fn from(results: Vec<R>) -> Self {
        Self::new(results)
    }
}

impl<R: PartialEq> PartialEq for ResultSnapshot<R> {
    fn eq(&self, other: &Self) -> bool {
        self.results[..] == other.results[..]
    }
}

impl<R: fmt::Debug> fmt::Debug for ResultSnapshot<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.results.iter()).finish()
    }
}
