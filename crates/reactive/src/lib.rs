//! Synq Reactive - Keeps a list of query observers in sync with a list of queries.
//!
//! This crate implements the reconciler behind "observe many queries at once":
//! given a changing list of query descriptors, it decides which observers to
//! keep, which to create, which to retire and which to repurpose so the
//! previous data stays on screen, and publishes results in the order the
//! queries were given.
//!
//! # Core Concepts
//!
//! - `QueriesObserver`: The reconciler; owns the observers and publishes snapshots
//! - `Observer` / `QueryClient`: Contracts of the per-resource observer and its client
//! - `Batcher`: Transaction boundary for notifications (`NotifyManager`, `ImmediateBatcher`)
//! - `ResultSnapshot`: Immutable, index-aligned list of results
//! - `Combine`: Memoized fold over a snapshot
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use synq_reactive::{NotifyManager, QueriesObserver};
//!
//! let observer = QueriesObserver::new(client, Rc::new(NotifyManager::new()), queries);
//!
//! // Subscribe: every observer starts delivering results
//! let id = observer.subscribe(|results| {
//!     for result in results.iter() { /* ... */ }
//! });
//!
//! // Replace the query list; matching observers are kept
//! observer.set_queries(next_queries);
//!
//! // Preview without committing
//! let preview = observer.optimistic_result(&other_queries);
//!
//! // Last listener gone: every observer is destroyed
//! observer.unsubscribe(id);
//! ```

#![no_std]

extern crate alloc;

pub mod combine;
pub mod notify;
pub mod observer;
pub mod queries;
pub mod reconcile;
pub mod snapshot;
pub mod subscription;

#[cfg(test)]
mod test_support;

pub use combine::Combine;
pub use notify::{Batcher, ImmediateBatcher, NotifyManager, Task};
pub use observer::{Observer, QueryClient, ResultCallback, ResultOf};
pub use queries::QueriesObserver;
pub use reconcile::{find_matching_observers, MatchKind, ObserverIndex, ObserverMatch};
pub use snapshot::ResultSnapshot;
pub use subscription::{Listener, ListenerSet, SubscriptionId};

// Re-export commonly used types from dependencies
pub use synq_core::{Descriptor, NotifyOptions, QueryHash, QueryKey, QueryOptions, QueryResult};
