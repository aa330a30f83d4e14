//! Low-level document store seam.
//!
//! `DocumentStore` is the narrow set of collection operations the repository
//! needs. `MongoStore` talks to a real deployment; `MemoryStore` keeps the
//! same semantics in process for tests and local runs.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use thiserror::Error;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("driver error: {0}")]
    Driver(String),
}

/// One collection of BSON documents. Filters are equality filters on
/// top-level fields; updates are `$set` merges.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn collection_name(&self) -> &str;

    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError>;

    /// Insert and return the `_id` the store assigned.
    async fn insert_one(&self, doc: Document) -> Result<Bson, StoreError>;

    /// Apply `$set: fields` to the first match; returns the number of
    /// documents whose content actually changed.
    async fn update_one(&self, filter: Document, fields: Document) -> Result<u64, StoreError>;

    async fn delete_one(&self, filter: Document) -> Result<u64, StoreError>;

    /// Create (or confirm) an ascending unique index on `field`. Later writes
    /// that would repeat a value fail with `DuplicateKey`.
    async fn ensure_unique_index(&self, field: &str) -> Result<(), StoreError>;

    /// Liveness probe of the database behind the collection.
    async fn ping(&self) -> Result<(), StoreError>;
}
