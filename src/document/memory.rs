//! In-process document store
//!
//! Collections live for as long as the client does. Used for tests and for
//! throwaway runs of the command-line tool.

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::document::documents::Documents;
use crate::document::types::{Document, Filter, RecordId, WriteAck};
use crate::document::{Collection, DocumentClient};
use crate::error::StoreError;

#[derive(Default)]
pub struct MemoryClient {
    collections: Mutex<HashMap<String, Arc<MemoryCollection>>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentClient for MemoryClient {
    async fn collection(&self, name: &str) -> Result<Arc<dyn Collection>, StoreError> {
        if name.is_empty() {
            return Err(StoreError::InvalidCollectionName(name.to_string()));
        }
        let mut collections = self.collections.lock().await;
        let collection = collections
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("Creating in-memory collection {}", name);
                Arc::new(MemoryCollection::new(name))
            })
            .clone();
        Ok(collection)
    }
}

pub struct MemoryCollection {
    name: String,
    docs: RwLock<Documents>,
}

impl MemoryCollection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            docs: RwLock::new(Documents::new()),
        }
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        Ok(self.docs.read().await.find_one(filter))
    }

    async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.docs.read().await.find_all())
    }

    async fn insert_one(&self, document: Document) -> Result<RecordId, StoreError> {
        Ok(self.docs.write().await.insert(document))
    }

    async fn set_field(
        &self,
        id: &RecordId,
        key: &str,
        value: Value,
    ) -> Result<WriteAck, StoreError> {
        self.docs.write().await.set_field(id, key, value)
    }

    async fn unset_field(&self, id: &RecordId, key: &str) -> Result<WriteAck, StoreError> {
        self.docs.write().await.unset_field(id, key)
    }

    async fn delete_one(&self, id: &RecordId) -> Result<WriteAck, StoreError> {
        Ok(self.docs.write().await.delete(id))
    }
}
