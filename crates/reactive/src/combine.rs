//! Memoized derivation of a single value from a result snapshot.

use crate::snapshot::ResultSnapshot;
use alloc::boxed::Box;

/// Folds a snapshot into one value, recomputing only when the snapshot
/// identity changes.
///
/// # Example
///
/// ```ignore
/// use core::cell::RefCell;
/// use synq_core::all_success;
/// use synq_reactive::Combine;
///
/// let ready = RefCell::new(Combine::new(|results| all_success(results)));
/// observer.subscribe(move |snapshot| {
///     if *ready.borrow_mut().get(snapshot) {
///         render();
///     }
/// });
/// ```
pub struct Combine<R, T> {
    combine: Box<dyn Fn(&[R]) -> T>,
    cached: Option<(ResultSnapshot<R>, T)>,
}

impl<R, T> Combine<R, T> {
    /// Creates a combiner from a fold over the results.
    pub fn new<F>(combine: F) -> Self
    where
        F: Fn(&[R]) -> T + 'static,
    {
        Self {
            combine: Box::new(combine),
            cached: None,
        }
    }

    /// Returns the combined value for `snapshot`.
    pub fn get(&mut self, snapshot: &ResultSnapshot<R>) -> &T {
        let stale = match &self.cached {
            Some((input, _)) => !ResultSnapshot::ptr_eq(input, snapshot),
            None => false,
        };
        if stale {
            self.cached = None;
        }
        let combine = &self.combine;
        &self
            .cached
            .get_or_insert_with(|| (snapshot.clone(), combine(snapshot.as_slice())))
            .1
    }

    /// Drops the cached value so the next `get` recomputes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
