//! Error types for Synq.
//!
//! The reconciler itself never fails. These errors describe resource failures
//! that observers carry inside their results, plus key canonicalization errors.

use alloc::string::String;
use core::fmt;

/// Result type alias for Synq operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for Synq resources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The resource fetch failed.
    Fetch {
        message: String,
    },
    /// The fetch was cancelled before it completed.
    Cancelled,
    /// The fetch did not complete in time.
    Timeout {
        after_ms: u64,
    },
    /// A query key could not be canonicalized.
    InvalidKey {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fetch { message } => write!(f, "Fetch failed: {}", message),
            Error::Cancelled => write!(f, "Fetch cancelled"),
            Error::Timeout { after_ms } => write!(f, "Fetch timed out after {}ms", after_ms),
            Error::InvalidKey { message } => write!(f, "Invalid query key: {}", message),
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    /// Creates a fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Error::Fetch {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(after_ms: u64) -> Self {
        Error::Timeout { after_ms }
    }

    /// Creates an invalid key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Error::InvalidKey {
            message: message.into(),
        }
    }
}
