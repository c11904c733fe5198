//! Document store types
//!
//! Documents, record identifiers, equality filters and write acknowledgements.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Name of the field carrying the store-assigned record id.
pub const ID_FIELD: &str = "_id";

/// A schemaless document: field name to JSON value.
pub type Document = Map<String, Value>;

/// Opaque identifier assigned by the store on insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reads the id out of a document, if it carries a well-formed one.
    pub fn of(document: &Document) -> Option<Self> {
        document
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    pub fn to_value(&self) -> Value {
        Value::String(self.0.to_string())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(RecordId)
    }
}

/// Equality predicate used to select a single document
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Id(RecordId),
    Field { name: String, value: Value },
}

impl Filter {
    pub fn id(id: RecordId) -> Self {
        Filter::Id(id)
    }

    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Field {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn username(username: &str) -> Self {
        Filter::field("username", username)
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::Id(id) => RecordId::of(document).as_ref() == Some(id),
            Filter::Field { name, value } => document.get(name) == Some(value),
        }
    }
}

/// Acknowledgement of a write, carrying how many documents matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteAck {
    pub matched: u64,
}

impl WriteAck {
    pub fn matched(&self) -> bool {
        self.matched > 0
    }
}
