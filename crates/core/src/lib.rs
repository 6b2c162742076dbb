//! Synq Core - Query keys, descriptors, and result types for Synq.
//!
//! This crate provides the foundational types shared by the reconciler and
//! the resource clients that plug into it:
//!
//! - `QueryKey` / `KeyPart`: Structured resource identifiers
//! - `QueryHash`: Canonical identity derived from a key
//! - `Descriptor`: What the reconciler needs to know about a normalized query
//! - `QueryOptions` / `QueryDefaults`: Default descriptor type and its configuration
//! - `QueryResult`: Per-query result shape with status, data, and error
//! - `Error`: Resource failures carried inside results
//!
//! # Example
//!
//! ```rust
//! use synq_core::{Descriptor, KeyPart, QueryDefaults, QueryKey, QueryOptions};
//!
//! let key = QueryKey::new(["todos"]).with(KeyPart::map([("page", 2)]));
//! let options = QueryOptions::new(key).normalized(&QueryDefaults::default());
//!
//! assert_eq!(
//!     options.query_hash().map(|h| h.as_str()),
//!     Some(r#"["todos",{"page":2}]"#)
//! );
//! ```

#![no_std]

extern crate alloc;

pub mod error;
pub mod key;
pub mod options;
pub mod result;

pub use error::{Error, Result};
pub use key::{KeyPart, QueryHash, QueryKey};
pub use options::{Descriptor, NotifyOptions, QueryDefaults, QueryOptions};
pub use result::{all_success, any_fetching, first_error, QueryResult, QueryStatus};
