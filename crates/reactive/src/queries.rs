//! `QueriesObserver`: keeps a list of observers in sync with a list of queries.
//!
//! Each call to `set_queries` runs a matching pass (see `reconcile`), rebinds
//! every matched observer, and commits the new observer list only if it
//! differs from the committed one by identity or order. While at least one
//! listener is subscribed, retired observers are destroyed, new ones are
//! subscribed, and one snapshot is published per batch.
//!
//! No `RefCell` borrow is held across calls into observers, the client, the
//! batcher or listeners, so any of them may call back into the reconciler.

use crate::notify::Batcher;
use crate::observer::{Observer, QueryClient, ResultOf};
use crate::reconcile::{
    difference, find_matching_observers, same_observers, MatchKind, ObserverIndex,
};
use crate::snapshot::ResultSnapshot;
use crate::subscription::{ListenerSet, SubscriptionId};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::mem;
use synq_core::NotifyOptions;

/// Committed reconciler state.
struct State<C: QueryClient> {
    /// Queries from the last `set_queries`, as given
    queries: Vec<C::Options>,
    /// Observers index-aligned with `queries`; empty after teardown
    observers: Vec<Rc<C::Observer>>,
    index: Rc<ObserverIndex>,
    result: ResultSnapshot<ResultOf<C>>,
    listeners: ListenerSet<ResultOf<C>>,
    /// A publish task is queued on the batcher
    notify_pending: bool,
    /// The last listener left; the next first listener gets a fresh publish
    torn_down: bool,
}

impl<C: QueryClient> State<C> {
    /// Observers were destroyed by teardown and not rebuilt since.
    fn needs_rebuild(&self) -> bool {
        self.observers.len() != self.queries.len()
    }
}

struct Shared<C: QueryClient> {
    client: C,
    batcher: Rc<dyn Batcher>,
    state: RefCell<State<C>>,
}

/// Reconciles a list of queries into a list of live observers.
///
/// # Example
///
/// ```ignore
/// use std::rc::Rc;
/// use synq_reactive::{NotifyManager, QueriesObserver};
///
/// let observer = QueriesObserver::new(client, Rc::new(NotifyManager::new()), vec![todos, user]);
///
/// let id = observer.subscribe(|results| {
///     println!("{} results", results.len());
/// });
///
/// // Reordering keeps both observers alive and publishes once.
/// observer.set_queries(vec![user, todos]);
///
/// observer.unsubscribe(id); // last listener: every observer is destroyed
/// ```
pub struct QueriesObserver<C: QueryClient + 'static> {
    shared: Rc<Shared<C>>,
}

impl<C: QueryClient + 'static> QueriesObserver<C> {
    /// Creates a reconciler and runs a first pass over `queries`.
    ///
    /// Observers are built immediately but only subscribed once a listener
    /// subscribes.
    pub fn new(client: C, batcher: Rc<dyn Batcher>, queries: Vec<C::Options>) -> Self {
        let shared = Rc::new(Shared {
            client,
            batcher,
            state: RefCell::new(State {
                queries: Vec::new(),
                observers: Vec::new(),
                index: Rc::new(ObserverIndex::default()),
                result: ResultSnapshot::empty(),
                listeners: ListenerSet::new(),
                notify_pending: false,
                torn_down: false,
            }),
        });
        let observer = Self { shared };
        observer.set_queries(queries);
        observer
    }

    /// Returns the resource client.
    pub fn client(&self) -> &C {
        &self.shared.client
    }

    /// Replaces the query list.
    pub fn set_queries(&self, queries: Vec<C::Options>) {
        self.set_queries_with(queries, NotifyOptions::default());
    }

    /// Replaces the query list, forwarding `notify` to every rebound observer.
    pub fn set_queries_with(&self, queries: Vec<C::Options>, notify: NotifyOptions) {
        let shared = &self.shared;
        let mut queries = Some(queries);
        shared.batcher.batch(&mut || {
            if let Some(queries) = queries.take() {
                shared.update(queries, notify);
            }
        });
    }

    /// Returns the last committed result snapshot.
    pub fn current_result(&self) -> ResultSnapshot<ResultOf<C>> {
        self.shared.state.borrow().result.clone()
    }

    /// Previews the results for `queries` without committing anything.
    ///
    /// Observers are neither rebound, subscribed nor destroyed. Observers
    /// built for unmatched queries are dropped afterwards.
    pub fn optimistic_result(&self, queries: &[C::Options]) -> Vec<ResultOf<C>> {
        let (previous, index) = self.shared.committed();
        find_matching_observers(&self.shared.client, queries, &previous, &index)
            .iter()
            .map(|m| m.observer.optimistic_result(&m.options))
            .collect()
    }

    /// Returns the queries from the last `set_queries`.
    pub fn queries(&self) -> Vec<C::Options> {
        self.shared.state.borrow().queries.clone()
    }

    /// Returns the committed observers in query order.
    ///
    /// Empty after the last listener unsubscribes, even though `queries()`
    /// is not. The list is rebuilt by the next `set_queries` or `subscribe`.
    pub fn observers(&self) -> Vec<Rc<C::Observer>> {
        self.shared.state.borrow().observers.clone()
    }

    /// Subscribes to result snapshots.
    ///
    /// The first listener subscribes every committed observer. If the
    /// observers were torn down by an earlier unsubscribe, they are rebuilt
    /// and a fresh snapshot is published.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ResultSnapshot<ResultOf<C>>) + 'static,
    {
        let (id, first) = {
            let mut state = self.shared.state.borrow_mut();
            let id = state.listeners.subscribe(listener);
            (id, state.listeners.len() == 1)
        };
        if first {
            self.shared.on_first_subscribe();
        }
        id
    }

    /// Removes a listener. The last one tears down every observer.
    ///
    /// Returns true if the listener was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let (removed, last) = {
            let mut state = self.shared.state.borrow_mut();
            let removed = state.listeners.unsubscribe(id);
            (removed, removed && state.listeners.is_empty())
        };
        if last {
            self.shared.teardown();
        }
        removed
    }

    /// Returns true if at least one listener is subscribed.
    pub fn has_listeners(&self) -> bool {
        !self.shared.state.borrow().listeners.is_empty()
    }

    /// Returns the number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.state.borrow().listeners.len()
    }

    /// Removes every listener and destroys every observer.
    pub fn destroy(&self) {
        self.shared.state.borrow_mut().listeners.clear();
        self.shared.teardown();
    }
}

impl<C: QueryClient + 'static> Drop for QueriesObserver<C> {
    fn drop(&mut self) {
        if self.has_listeners() {
            self.destroy();
        }
    }
}

impl<C: QueryClient + 'static> Shared<C> {
    fn committed(&self) -> (Vec<Rc<C::Observer>>, Rc<ObserverIndex>) {
        let state = self.state.borrow();
        (state.observers.clone(), Rc::clone(&state.index))
    }

    /// One reconciliation pass. Must run inside a batch.
    fn update(self: &Rc<Self>, queries: Vec<C::Options>, notify: NotifyOptions) {
        let (previous, index) = self.committed();

        let matches = find_matching_observers(&self.client, &queries, &previous, &index);
        for m in &matches {
            m.observer.set_options(&m.options, notify);
        }

        let observers: Vec<Rc<C::Observer>> = matches.iter().map(|m| Rc::clone(&m.observer)).collect();
        let unchanged = same_observers(&previous, &observers);

        let count = |kind: MatchKind| matches.iter().filter(|m| m.kind == kind).count();
        tracing::debug!(
            queries = queries.len(),
            matched = count(MatchKind::Matched),
            retained = count(MatchKind::Retained),
            created = count(MatchKind::Created),
            unchanged,
            "reconciled queries"
        );

        if unchanged {
            // Retention may have rebound an observer to a new key in place.
            let new_index = ObserverIndex::build(&observers);
            let mut state = self.state.borrow_mut();
            state.queries = queries;
            state.index = Rc::new(new_index);
            return;
        }

        let result: Vec<ResultOf<C>> = observers.iter().map(|o| o.current_result()).collect();
        let new_index = ObserverIndex::build(&observers);

        let active = {
            let mut state = self.state.borrow_mut();
            state.queries = queries;
            state.observers = observers.clone();
            state.index = Rc::new(new_index);
            state.result = ResultSnapshot::new(result);
            !state.listeners.is_empty()
        };
        if !active {
            return;
        }

        for retired in difference(&previous, &observers) {
            retired.destroy();
        }
        for added in difference(&observers, &previous) {
            self.subscribe_observer(&added);
        }
        self.notify();
    }

    fn subscribe_observer(self: &Rc<Self>, observer: &Rc<C::Observer>) {
        let shared = Rc::downgrade(self);
        let target = Rc::downgrade(observer);
        observer.subscribe(Box::new(move |result| {
            if let (Some(shared), Some(observer)) = (shared.upgrade(), target.upgrade()) {
                shared.on_update(&observer, result);
            }
        }));
    }

    /// Splices one observer's new result into the snapshot.
    fn on_update(self: &Rc<Self>, observer: &Rc<C::Observer>, result: ResultOf<C>) {
        let position = {
            let mut state = self.state.borrow_mut();
            let position = state.observers.iter().position(|o| Rc::ptr_eq(o, observer));
            if let Some(index) = position {
                state.result = state.result.replace_at(index, result);
            }
            position
        };
        match position {
            Some(index) => {
                tracing::trace!(index, "observer result updated");
                self.notify();
            }
            None => tracing::trace!("ignoring result from a superseded observer"),
        }
    }

    fn on_first_subscribe(self: &Rc<Self>) {
        let (observers, queries, torn_down) = {
            let mut state = self.state.borrow_mut();
            let torn_down = mem::replace(&mut state.torn_down, false);
            if state.needs_rebuild() {
                (Vec::new(), Some(state.queries.clone()), torn_down)
            } else {
                (state.observers.clone(), None, torn_down)
            }
        };
        let mut queries = queries;

        self.batcher.batch(&mut || {
            match queries.take() {
                Some(queries) => {
                    tracing::debug!(queries = queries.len(), "rebuilding observers after teardown");
                    self.update(queries, NotifyOptions::default());
                }
                None => {
                    tracing::debug!(observers = observers.len(), "first listener subscribed");
                    for observer in &observers {
                        self.subscribe_observer(observer);
                    }
                }
            }
            if torn_down {
                self.notify();
            }
        });
    }

    /// Destroys every observer. The last snapshot stays readable.
    fn teardown(&self) {
        let observers = {
            let mut state = self.state.borrow_mut();
            state.torn_down = true;
            state.index = Rc::new(ObserverIndex::default());
            mem::take(&mut state.observers)
        };
        if observers.is_empty() {
            return;
        }
        tracing::debug!(observers = observers.len(), "tearing down observers");
        self.batcher.batch(&mut || {
            for observer in &observers {
                observer.destroy();
            }
        });
    }

    /// Queues one publish per batch; the task reads the snapshot at flush time.
    fn notify(self: &Rc<Self>) {
        {
            let mut state = self.state.borrow_mut();
            if state.notify_pending {
                return;
            }
            state.notify_pending = true;
        }
        let shared = Rc::downgrade(self);
        self.batcher.schedule(Box::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.publish();
            }
        }));
    }

    fn publish(&self) {
        let (snapshot, listeners) = {
            let mut state = self.state.borrow_mut();
            state.notify_pending = false;
            (state.result.clone(), state.listeners.to_vec())
        };
        for listener in listeners {
            listener(&snapshot);
        }
    }
}
