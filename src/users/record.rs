//! User records and attribute changes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::{Document, ID_FIELD, RecordId};
use crate::error::UserError;

pub const USERNAME_FIELD: &str = "username";
pub const PASSWORD_FIELD: &str = "password";

/// Open-ended extension attributes attached to a user
pub type Attributes = Map<String, Value>;

/// A stored user: identity, hashed credential and free-form attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub username: String,
    /// Self-describing password hash, never the plaintext.
    pub password: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl UserRecord {
    pub fn from_document(document: Document) -> Result<Self, UserError> {
        serde_json::from_value(Value::Object(document))
            .map_err(|e| UserError::CorruptRecord(e.to_string()))
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(ID_FIELD.to_string(), self.id.to_value());
        doc.insert(USERNAME_FIELD.to_string(), Value::String(self.username.clone()));
        doc.insert(PASSWORD_FIELD.to_string(), Value::String(self.password.clone()));
        for (key, value) in &self.attributes {
            doc.insert(key.clone(), value.clone());
        }
        doc
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Whether the stored document currently carries `name`.
    pub fn has_field(&self, name: &str) -> bool {
        matches!(name, ID_FIELD | USERNAME_FIELD | PASSWORD_FIELD)
            || self.attributes.contains_key(name)
    }
}

/// One requested change to a user attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeChange {
    /// Store this value; `Value::Null` is stored as a JSON null.
    Set(Value),
    /// Remove the attribute if the record has it.
    Delete,
}

/// Ordered set of attribute changes, at most one per attribute name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeChanges {
    entries: Vec<(String, AttributeChange)>,
}

impl AttributeChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, AttributeChange::Set(value.into()));
        self
    }

    pub fn delete(mut self, name: impl Into<String>) -> Self {
        self.push(name, AttributeChange::Delete);
        self
    }

    /// Adds a change; a later change to the same name replaces the earlier one in place.
    pub fn push(&mut self, name: impl Into<String>, change: AttributeChange) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = change,
            None => self.entries.push((name, change)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeChange)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeChange)> for AttributeChanges {
    fn from_iter<I: IntoIterator<Item = (K, AttributeChange)>>(iter: I) -> Self {
        let mut changes = AttributeChanges::new();
        for (name, change) in iter {
            changes.push(name, change);
        }
        changes
    }
}
