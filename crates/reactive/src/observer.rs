//! Contracts of the collaborators the reconciler drives.
//!
//! An `Observer` tracks one resource: it fetches, caches and retries on its
//! own and reports results through a callback. A `QueryClient` normalizes
//! descriptors and builds observers. The reconciler only relies on the
//! operations below and is agnostic to the kind of resource behind them.

use alloc::boxed::Box;
use alloc::rc::Rc;
use synq_core::{Descriptor, NotifyOptions, QueryHash};

/// Callback invoked with an observer's new result.
pub type ResultCallback<R> = Box<dyn Fn(R)>;

/// A subscription to a single resource.
///
/// All methods take `&self`: observers are shared through `Rc` and keep their
/// state behind interior mutability. Implementations may invoke subscribed
/// callbacks synchronously from any method.
pub trait Observer {
    /// Descriptor type the observer is bound to.
    type Options: Descriptor;
    /// Result type the observer reports.
    type Result: Clone;

    /// Canonical key of the currently bound options.
    fn query_hash(&self) -> Option<QueryHash>;

    /// Rebinds the observer to new options, keeping its identity.
    fn set_options(&self, options: &Self::Options, notify: NotifyOptions);

    /// Returns the latest result.
    fn current_result(&self) -> Self::Result;

    /// Returns the result this observer would report if bound to `options`,
    /// without rebinding.
    fn optimistic_result(&self, options: &Self::Options) -> Self::Result {
        let _ = options;
        self.current_result()
    }

    /// Registers a callback for result changes.
    fn subscribe(&self, on_change: ResultCallback<Self::Result>);

    /// Releases the observer. No callback fires afterwards.
    fn destroy(&self);
}

/// The resource client that owns normalization and observer construction.
pub trait QueryClient {
    /// Descriptor type accepted by the client.
    type Options: Descriptor;
    /// Observer type built by the client.
    type Observer: Observer<Options = Self::Options>;

    /// Normalizes a descriptor, deriving its canonical key.
    ///
    /// Must be pure and deterministic.
    fn default_query_options(&self, options: &Self::Options) -> Self::Options;

    /// Builds a new observer bound to normalized `options`.
    fn build_observer(&self, options: &Self::Options) -> Rc<Self::Observer>;
}

/// Result type reported by a client's observers.
pub type ResultOf<C> = <<C as QueryClient>::Observer as Observer>::Result;
