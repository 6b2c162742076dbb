//! Listener management for result snapshots.
//!
//! This module provides subscription IDs and an insertion-ordered set of
//! listeners that receive published snapshots.

use crate::snapshot::ResultSnapshot;
use alloc::rc::Rc;
use alloc::vec::Vec;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback type for snapshot notifications.
pub type Listener<R> = Rc<dyn Fn(&ResultSnapshot<R>)>;

/// Listeners of one reconciler, notified in subscription order.
pub struct ListenerSet<R> {
    /// Active listeners
    listeners: Vec<(SubscriptionId, Listener<R>)>,
    /// Next subscription ID to assign
    next_id: SubscriptionId,
}

impl<R> Default for ListenerSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ListenerSet<R> {
    /// Creates an empty listener set.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    /// Adds a listener.
    ///
    /// Returns the subscription ID that can be used to unsubscribe.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ResultSnapshot<R>) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Rc::new(callback)));
        id
    }

    /// Removes a listener by ID.
    ///
    /// Returns true if the listener was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(sub_id, _)| *sub_id != id);
        self.listeners.len() < len_before
    }

    /// Returns the current listeners so they can be invoked without holding
    /// a borrow of the owner.
    pub fn to_vec(&self) -> Vec<Listener<R>> {
        self.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
    }

    /// Returns the number of listeners.
    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if there are no listeners.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Removes all listeners.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
