//! Document store abstraction
//!
//! The credential store is written against these traits; the concrete engine
//! is injected. Two engines are bundled: an in-process one and a JSON file one.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::error::StoreError;

pub mod documents;
pub mod json_file;
pub mod memory;
pub mod types;

pub use json_file::JsonFileClient;
pub use memory::MemoryClient;
pub use types::{Document, Filter, ID_FIELD, RecordId, WriteAck};

/// A client able to hand out named collections
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Returns the named collection, creating it if it does not exist yet.
    async fn collection(&self, name: &str) -> Result<Arc<dyn Collection>, StoreError>;
}

/// A keyed collection of schemaless documents
#[async_trait]
pub trait Collection: Send + Sync {
    fn name(&self) -> &str;

    /// First document matching the filter, in iteration order.
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError>;

    /// Every document, in the collection's natural iteration order.
    async fn find_all(&self) -> Result<Vec<Document>, StoreError>;

    /// Stores the document under a newly assigned id.
    async fn insert_one(&self, document: Document) -> Result<RecordId, StoreError>;

    async fn set_field(
        &self,
        id: &RecordId,
        key: &str,
        value: Value,
    ) -> Result<WriteAck, StoreError>;

    async fn unset_field(&self, id: &RecordId, key: &str) -> Result<WriteAck, StoreError>;

    async fn delete_one(&self, id: &RecordId) -> Result<WriteAck, StoreError>;
}
