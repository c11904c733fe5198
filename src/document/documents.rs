//! In-memory document engine
//!
//! Holds an insertion-ordered list of documents and implements the
//! find/insert/set/unset/delete semantics shared by every bundled backend.

use serde_json::Value;

use crate::document::types::{Document, Filter, ID_FIELD, RecordId, WriteAck};
use crate::error::StoreError;

#[derive(Debug, Clone, Default)]
pub struct Documents {
    docs: Vec<Document>,
}

impl Documents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts previously persisted documents; each must carry a valid id.
    pub fn from_documents(docs: Vec<Document>, collection: &str) -> Result<Self, StoreError> {
        if let Some(pos) = docs.iter().position(|d| RecordId::of(d).is_none()) {
            return Err(StoreError::CorruptCollection(format!(
                "{}: document {} has no valid {}",
                collection, pos, ID_FIELD
            )));
        }
        Ok(Self { docs })
    }

    pub fn as_slice(&self) -> &[Document] {
        &self.docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn find_one(&self, filter: &Filter) -> Option<Document> {
        self.docs.iter().find(|d| filter.matches(d)).cloned()
    }

    pub fn find_all(&self) -> Vec<Document> {
        self.docs.clone()
    }

    /// Inserts a document under a freshly assigned id, replacing any id it carried.
    pub fn insert(&mut self, mut document: Document) -> RecordId {
        let id = RecordId::new();
        document.insert(ID_FIELD.to_string(), id.to_value());
        self.docs.push(document);
        id
    }

    pub fn set_field(
        &mut self,
        id: &RecordId,
        key: &str,
        value: Value,
    ) -> Result<WriteAck, StoreError> {
        if key == ID_FIELD {
            return Err(StoreError::ImmutableId(key.to_string()));
        }
        Ok(match self.position(id) {
            Some(pos) => {
                self.docs[pos].insert(key.to_string(), value);
                WriteAck { matched: 1 }
            }
            None => WriteAck::default(),
        })
    }

    pub fn unset_field(&mut self, id: &RecordId, key: &str) -> Result<WriteAck, StoreError> {
        if key == ID_FIELD {
            return Err(StoreError::ImmutableId(key.to_string()));
        }
        Ok(match self.position(id) {
            Some(pos) => {
                self.docs[pos].remove(key);
                WriteAck { matched: 1 }
            }
            None => WriteAck::default(),
        })
    }

    pub fn delete(&mut self, id: &RecordId) -> WriteAck {
        match self.position(id) {
            Some(pos) => {
                self.docs.remove(pos);
                WriteAck { matched: 1 }
            }
            None => WriteAck::default(),
        }
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        let filter = Filter::id(*id);
        self.docs.iter().position(|d| filter.matches(d))
    }
}
