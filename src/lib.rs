//! Credential store - a minimal user-account store
//!
//! Maps usernames to bcrypt-hashed credentials plus free-form attributes on
//! top of a pluggable document store, and checks username/password pairs.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod hashing;
pub mod login;
pub mod users;

pub use crate::config::AppConfig;
pub use document::{Collection, DocumentClient, JsonFileClient, MemoryClient, RecordId};
pub use error::{AppError, HashError, LoginPageError, StoreError, UserError};
pub use hashing::{BcryptHasher, PasswordHasher};
pub use login::render_login;
pub use users::{AttributeChange, AttributeChanges, Attributes, CredentialStore, UserRecord};
