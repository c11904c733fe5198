//! User accounts
//!
//! User records, attribute changes and the credential store that manages them.

pub mod record;
pub mod store;

pub use record::{AttributeChange, AttributeChanges, Attributes, UserRecord};
pub use store::CredentialStore;
