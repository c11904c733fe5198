//! JSON file document store
//!
//! Each collection is persisted as a pretty-printed JSON array in
//! `<data_dir>/<collection>.json`. A collection is loaded on first use and
//! rewritten in full after every successful mutation.

use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};

use crate::document::documents::Documents;
use crate::document::types::{Document, Filter, RecordId, WriteAck};
use crate::document::{Collection, DocumentClient};
use crate::error::StoreError;

pub struct JsonFileClient {
    data_dir: PathBuf,
    collections: Mutex<HashMap<String, Arc<JsonFileCollection>>>,
}

impl JsonFileClient {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            collections: Mutex::new(HashMap::new()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn collection_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidCollectionName(name.to_string()));
        }
        Ok(self.data_dir.join(format!("{}.json", name)))
    }
}

#[async_trait]
impl DocumentClient for JsonFileClient {
    async fn collection(&self, name: &str) -> Result<Arc<dyn Collection>, StoreError> {
        let path = self.collection_path(name)?;
        let mut collections = self.collections.lock().await;
        if let Some(existing) = collections.get(name) {
            return Ok(existing.clone());
        }

        fs::create_dir_all(&self.data_dir).await?;
        let collection = Arc::new(JsonFileCollection::open(name, path).await?);
        collections.insert(name.to_string(), collection.clone());
        Ok(collection)
    }
}

pub struct JsonFileCollection {
    name: String,
    path: PathBuf,
    docs: RwLock<Documents>,
}

impl JsonFileCollection {
    async fn open(name: &str, path: PathBuf) -> Result<Self, StoreError> {
        let docs = match fs::read(&path).await {
            Ok(bytes) => {
                let value: Value = serde_json::from_slice(&bytes)?;
                let Value::Array(items) = value else {
                    return Err(StoreError::CorruptCollection(format!(
                        "{}: expected a JSON array",
                        path.display()
                    )));
                };
                let docs = items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(doc) => Ok(doc),
                        other => Err(StoreError::CorruptCollection(format!(
                            "{}: expected an object, found {}",
                            path.display(),
                            other
                        ))),
                    })
                    .collect::<Result<Vec<Document>, StoreError>>()?;
                Documents::from_documents(docs, name)?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Documents::new(),
            Err(e) => return Err(StoreError::from(e)),
        };

        info!(
            "Opened collection {} ({} documents) at {}",
            name,
            docs.len(),
            path.display()
        );

        Ok(Self {
            name: name.to_string(),
            path,
            docs: RwLock::new(docs),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `op` to a copy of the collection, persists the copy, then
    /// swaps it in. A failed write leaves the in-memory view untouched.
    async fn mutate<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Documents) -> Result<T, StoreError>,
    {
        let mut docs = self.docs.write().await;
        let mut next = docs.clone();
        let out = op(&mut next)?;
        self.persist(&next).await?;
        *docs = next;
        Ok(out)
    }

    async fn persist(&self, docs: &Documents) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(docs.as_slice())?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!("Persisted {} documents to {}", docs.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl Collection for JsonFileCollection {
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
        self.mutate(|docs| Ok(docs.insert(document))).await
    }

    async fn set_field(
        &self,
        id: &RecordId,
        key: &str,
        value: Value,
    ) -> Result<WriteAck, StoreError> {
        self.mutate(|docs| docs.set_field(id, key, value)).await
    }

    async fn unset_field(&self, id: &RecordId, key: &str) -> Result<WriteAck, StoreError> {
        self.mutate(|docs| docs.unset_field(id, key)).await
    }

    async fn delete_one(&self, id: &RecordId) -> Result<WriteAck, StoreError> {
        self.mutate(|docs| Ok(docs.delete(id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn alice() -> Document {
        json!({"username": "alice", "email": "alice@example.com"})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_collection() {
        let tmp_dir = TempDir::new().unwrap();
        let client = JsonFileClient::new(tmp_dir.path().join("nested"));
        let users = client.collection("users").await.unwrap();

        assert!(users.find_all().await.unwrap().is_empty());
        assert!(tmp_dir.path().join("nested").is_dir());
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let tmp_dir = TempDir::new().unwrap();

        let id = {
            let client = JsonFileClient::new(tmp_dir.path());
            let users = client.collection("users").await.unwrap();
            let id = users.insert_one(alice()).await.unwrap();
            users.set_field(&id, "is_active", json!(true)).await.unwrap();
            users.unset_field(&id, "email").await.unwrap();
            id
        };

        let client = JsonFileClient::new(tmp_dir.path());
        let users = client.collection("users").await.unwrap();
        let doc = users.find_one(&Filter::id(id)).await.unwrap().unwrap();
        assert_eq!(doc["username"], json!("alice"));
        assert_eq!(doc["is_active"], json!(true));
        assert!(!doc.contains_key("email"));
    }

    #[tokio::test]
    async fn test_delete_is_persisted() {
        let tmp_dir = TempDir::new().unwrap();
        let client = JsonFileClient::new(tmp_dir.path());
        let users = client.collection("users").await.unwrap();
        let id = users.insert_one(alice()).await.unwrap();
        assert!(users.delete_one(&id).await.unwrap().matched());

        let raw = std::fs::read_to_string(tmp_dir.path().join("users.json")).unwrap();
        let parsed: Vec<Document> = serde_json::from_str(&raw).unwrap();
        assert!(parsed.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_unsafe_collection_names() {
        let tmp_dir = TempDir::new().unwrap();
        let client = JsonFileClient::new(tmp_dir.path());
        for name in ["", "../users", "a/b", "users.json"] {
            assert!(matches!(
                client.collection(name).await,
                Err(StoreError::InvalidCollectionName(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let tmp_dir = TempDir::new().unwrap();
        std::fs::write(tmp_dir.path().join("users.json"), "{\"not\": \"an array\"}").unwrap();
        let client = JsonFileClient::new(tmp_dir.path());
        assert!(matches!(
            client.collection("users").await,
            Err(StoreError::CorruptCollection(_))
        ));
    }

    #[tokio::test]
    async fn test_rejected_write_leaves_collection_unchanged() {
        let tmp_dir = TempDir::new().unwrap();
        let client = JsonFileClient::new(tmp_dir.path());
        let users = client.collection("users").await.unwrap();
        let id = users.insert_one(alice()).await.unwrap();

        assert!(users.set_field(&id, "_id", json!("x")).await.is_err());
        let doc = users.find_one(&Filter::id(id)).await.unwrap();
        assert!(doc.is_some());
    }
}
