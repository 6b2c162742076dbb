//! Per-query result shape.
//!
//! Observers report a `QueryResult` for their resource. Failures are carried in
//! the `error` field rather than raised.

use crate::error::Error;

/// Lifecycle status of a query result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// No data yet
    #[default]
    Pending,
    /// Data loaded
    Success,
    /// Last fetch failed
    Error,
}

/// The observable state of one query.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResult<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<Error>,
    /// A fetch is in flight.
    pub is_fetching: bool,
    /// `data` belongs to the previously observed key.
    pub is_previous_data: bool,
    /// Timestamp of the last successful fetch, in milliseconds.
    pub data_updated_at: u64,
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self::pending()
    }
}

impl<T> QueryResult<T> {
    /// A result with no data and no error.
    pub fn pending() -> Self {
        Self {
            status: QueryStatus::Pending,
            data: None,
            error: None,
            is_fetching: false,
            is_previous_data: false,
            data_updated_at: 0,
        }
    }

    /// A successful result.
    pub fn success(data: T) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            ..Self::pending()
        }
    }

    /// A failed result.
    pub fn failure(error: Error) -> Self {
        Self {
            status: QueryStatus::Error,
            error: Some(error),
            ..Self::pending()
        }
    }

    /// Marks a fetch as in flight.
    pub fn fetching(mut self) -> Self {
        self.is_fetching = true;
        self
    }

    /// Marks the data as carried over from a previous key.
    pub fn previous_data(mut self) -> Self {
        self.is_previous_data = true;
        self
    }

    /// Sets the update timestamp.
    pub fn updated_at(mut self, millis: u64) -> Self {
        self.data_updated_at = millis;
        self
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == QueryStatus::Pending
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

/// Returns true if every result is successful. Empty input counts as success.
pub fn all_success<T>(results: &[QueryResult<T>]) -> bool {
    results.iter().all(QueryResult::is_success)
}

/// Returns true if any result has a fetch in flight.
pub fn any_fetching<T>(results: &[QueryResult<T>]) -> bool {
    results.iter().any(|r| r.is_fetching)
}

/// Returns the first error in list order.
pub fn first_error<T>(results: &[QueryResult<T>]) -> Option<&Error> {
    results.iter().find_map(|r| r.error.as_ref())
}
