//! Query descriptors and client-level defaults.

use crate::key::{QueryHash, QueryKey};

/// A normalized descriptor as seen by the reconciler.
///
/// Implemented by `QueryOptions`; clients with richer option types implement
/// it on their own descriptors.
pub trait Descriptor: Clone {
    /// Canonical key, or `None` if the descriptor cannot be identified.
    fn query_hash(&self) -> Option<&QueryHash>;

    /// Whether an unmatched descriptor may take over an orphaned observer.
    fn keep_previous_data(&self) -> bool;
}

/// Defaults merged into every descriptor during normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryDefaults {
    /// Whether queries fetch automatically.
    pub enabled: bool,
    /// Whether unmatched queries retain previous data.
    pub keep_previous_data: bool,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            enabled: true,
            keep_previous_data: false,
        }
    }
}

impl QueryDefaults {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default `enabled` flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the default `keep_previous_data` flag.
    pub fn with_keep_previous_data(mut self, keep: bool) -> Self {
        self.keep_previous_data = keep;
        self
    }
}

/// Options describing one query.
///
/// Unset fields fall back to `QueryDefaults` in `normalized`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOptions {
    pub query_key: Option<QueryKey>,
    pub query_hash: Option<QueryHash>,
    pub enabled: Option<bool>,
    pub keep_previous_data: Option<bool>,
}

impl QueryOptions {
    /// Creates options for the given key.
    pub fn new(query_key: QueryKey) -> Self {
        Self {
            query_key: Some(query_key),
            ..Self::default()
        }
    }

    /// Creates options without a key. These never match an existing observer.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_keep_previous_data(mut self, keep: bool) -> Self {
        self.keep_previous_data = Some(keep);
        self
    }

    /// Returns the resolved `enabled` flag.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Resolves defaults and derives the canonical hash from the key.
    ///
    /// An explicit `query_hash` is kept. A key that fails to canonicalize
    /// leaves the hash unset.
    pub fn normalized(&self, defaults: &QueryDefaults) -> Self {
        let query_hash = self.query_hash.clone().or_else(|| {
            self.query_key
                .as_ref()
                .and_then(|key| key.canonical_hash().ok())
        });

        Self {
            query_key: self.query_key.clone(),
            query_hash,
            enabled: Some(self.enabled.unwrap_or(defaults.enabled)),
            keep_previous_data: Some(
                self.keep_previous_data
                    .unwrap_or(defaults.keep_previous_data),
            ),
        }
    }
}

impl Descriptor for QueryOptions {
    fn query_hash(&self) -> Option<&QueryHash> {
        self.query_hash.as_ref()
    }

    fn keep_previous_data(&self) -> bool {
        self.keep_previous_data.unwrap_or(false)
    }
}

/// Hints forwarded to an observer when its options change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotifyOptions {
    /// Whether the observer should notify its listeners about the change.
    pub listeners: bool,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self { listeners: true }
    }
}

impl NotifyOptions {
    /// Options that suppress listener notification.
    pub fn silent() -> Self {
        Self { listeners: false }
    }
}
