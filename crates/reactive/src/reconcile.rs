//! The matching pass: map a new descriptor list onto existing observers.
//!
//! Matching runs in two rounds. First every descriptor claims the previous
//! observer indexed under its canonical key. Then each unmatched descriptor,
//! in list order, either takes over the first unclaimed previous observer (if
//! it asks to keep previous data) or gets an observer of its own. A keyed
//! descriptor that missed in the first round can only have missed because
//! its indexed observer was already claimed, so the index is not consulted
//! again. The output
//! is always in descriptor order and never places one observer twice.

use crate::observer::{Observer, QueryClient};
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};
use synq_core::{Descriptor, QueryHash};

/// How an observer came to serve a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Previous observer with the same canonical key
    Matched,
    /// Orphaned previous observer taken over to keep previous data
    Retained,
    /// Freshly built observer
    Created,
}

/// One descriptor paired with the observer that will serve it.
pub struct ObserverMatch<O: Observer> {
    /// The normalized descriptor
    pub options: O::Options,
    pub observer: Rc<O>,
    pub kind: MatchKind,
}

/// Canonical key → position in the committed observer list.
///
/// Rebuilt from scratch after every committed pass.
#[derive(Clone, Debug, Default)]
pub struct ObserverIndex {
    positions: HashMap<QueryHash, usize>,
}

impl ObserverIndex {
    /// Indexes observers by their current canonical key.
    ///
    /// The first observer wins when two share a key. Observers without a key
    /// are not indexed.
    pub fn build<O: Observer>(observers: &[Rc<O>]) -> Self {
        let mut positions = HashMap::with_capacity(observers.len());
        for (pos, observer) in observers.iter().enumerate() {
            if let Some(hash) = observer.query_hash() {
                positions.entry(hash).or_insert(pos);
            }
        }
        Self { positions }
    }

    /// Returns the position of the observer indexed under `hash`.
    #[inline]
    pub fn get(&self, hash: &QueryHash) -> Option<usize> {
        self.positions.get(hash).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Computes which observer serves each descriptor.
///
/// `previous` and `index` are the committed state of the last pass. Nothing
/// is mutated: no observer is rebound, subscribed or destroyed here. New
/// observers are built through the client and only become live once the
/// caller commits them.
pub fn find_matching_observers<C: QueryClient>(
    client: &C,
    queries: &[C::Options],
    previous: &[Rc<C::Observer>],
    index: &ObserverIndex,
) -> Vec<ObserverMatch<C::Observer>> {
    let normalized: Vec<C::Options> = queries
        .iter()
        .map(|q| client.default_query_options(q))
        .collect();

    let mut claimed = vec![false; previous.len()];
    let mut slots: Vec<Option<ObserverMatch<C::Observer>>> = Vec::with_capacity(normalized.len());
    let mut unmatched = Vec::new();
    let mut seen: HashSet<&QueryHash> = HashSet::with_capacity(normalized.len());

    for (i, options) in normalized.iter().enumerate() {
        let hit = options.query_hash().and_then(|hash| {
            if !seen.insert(hash) {
                tracing::warn!(query_hash = %hash, "duplicate query key in one list; first occurrence wins");
            }
            index.get(hash)
        });

        match hit.filter(|&pos| pos < previous.len() && !claimed[pos]) {
            Some(pos) => {
                claimed[pos] = true;
                slots.push(Some(ObserverMatch {
                    options: options.clone(),
                    observer: Rc::clone(&previous[pos]),
                    kind: MatchKind::Matched,
                }));
            }
            None => {
                unmatched.push(i);
                slots.push(None);
            }
        }
    }

    let mut orphans: VecDeque<usize> = (0..previous.len()).filter(|&pos| !claimed[pos]).collect();

    for i in unmatched {
        let options = &normalized[i];

        let retained = if options.keep_previous_data() {
            orphans.pop_front()
        } else {
            None
        };

        let (observer, kind) = match retained {
            Some(pos) => (Rc::clone(&previous[pos]), MatchKind::Retained),
            None => (client.build_observer(options), MatchKind::Created),
        };

        slots[i] = Some(ObserverMatch {
            options: options.clone(),
            observer,
            kind,
        });
    }

    slots.into_iter().flatten().collect()
}

/// Returns the observers of `a` that are not in `b`, compared by identity.
pub fn difference<O>(a: &[Rc<O>], b: &[Rc<O>]) -> Vec<Rc<O>> {
    let in_b: HashSet<*const O> = b.iter().map(Rc::as_ptr).collect();
    a.iter()
        .filter(|o| !in_b.contains(&Rc::as_ptr(o)))
        .cloned()
        .collect()
}

/// Returns true if both lists hold the same observers in the same order.
pub fn same_observers<O>(a: &[Rc<O>], b: &[Rc<O>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Rc::ptr_eq(x, y))
}
