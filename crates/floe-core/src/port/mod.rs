//! Module: port
//! Responsibility: the async store contract the session runs against,
//! plus the in-memory store used for tests and local development.
//! Does not own: query compilation, record encoding, pagination policy.
//! Boundary: implementations supply transport, auth, and retries; the
//! session never sees past this trait.

mod memory;

pub use memory::MemoryStore;

use crate::{
    key::RecordKey,
    query::{FlatProps, NativeQuery, QueryPage},
};
use async_trait::async_trait;
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("key not found: {key}")]
    NotFound { key: String },

    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    #[error("store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

///
/// StorePort
///
/// One remote key-value document store. Rows cross this boundary in
/// their flat form only.
///

#[async_trait]
pub trait StorePort: Send + Sync {
    /// Run one page of a compiled query.
    async fn run_query(&self, query: &NativeQuery) -> Result<QueryPage, StoreError>;

    /// Write one row. An incomplete key gets a store-assigned
    /// identifier; the returned key is always complete.
    async fn put(&self, key: RecordKey, props: FlatProps) -> Result<RecordKey, StoreError>;

    /// Remove one row. Removing an absent key follows the store's own
    /// semantics; it is not normalized here.
    async fn delete(&self, key: RecordKey) -> Result<(), StoreError>;
}
