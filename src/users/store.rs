//! Credential store
//!
//! CRUD and authentication over user records kept in a document collection.
//! Passwords are hashed before they are written; nothing below ever stores a
//! plaintext credential.
//!
//! Every operation is a lookup followed by at most one write per change.
//! There is no transaction around the lookup and the write, so two concurrent
//! `create_user` calls for the same name can both succeed, and a store failure
//! in the middle of `update_user` leaves the earlier changes applied.

use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;

use crate::document::{Collection, DocumentClient, Filter, ID_FIELD, RecordId};
use crate::error::{HashError, UserError};
use crate::hashing::PasswordHasher;
use crate::users::record::{
    AttributeChange, AttributeChanges, Attributes, PASSWORD_FIELD, USERNAME_FIELD, UserRecord,
};

enum Binding {
    Unbound,
    Bound(Arc<dyn Collection>),
}

/// Store write resolved from an [`AttributeChange`] against the current record.
enum FieldWrite {
    Set(String, Value),
    Unset(String),
    Skip(String),
}

pub struct CredentialStore {
    client: Arc<dyn DocumentClient>,
    hasher: Arc<dyn PasswordHasher>,
    binding: Binding,
}

impl CredentialStore {
    /// Creates an unbound store. Call [`initialize`](Self::initialize) before use.
    pub fn new(client: Arc<dyn DocumentClient>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            client,
            hasher,
            binding: Binding::Unbound,
        }
    }

    /// Binds the store to the named collection. Calling it again rebinds.
    pub async fn initialize(&mut self, collection: &str) -> Result<(), UserError> {
        let bound = self.client.collection(collection).await?;
        if let Binding::Bound(previous) = &self.binding {
            debug!("Rebinding user store from {} to {}", previous.name(), collection);
        }
        info!("User store bound to collection {}", collection);
        self.binding = Binding::Bound(bound);
        Ok(())
    }

    pub fn collection_name(&self) -> Option<&str> {
        match &self.binding {
            Binding::Unbound => None,
            Binding::Bound(collection) => Some(collection.name()),
        }
    }

    fn collection(&self) -> Result<&Arc<dyn Collection>, UserError> {
        match &self.binding {
            Binding::Unbound => Err(UserError::Uninitialized),
            Binding::Bound(collection) => Ok(collection),
        }
    }

    /// All users, in the collection's iteration order.
    pub async fn get_users(&self) -> Result<Vec<UserRecord>, UserError> {
        let users = self.collection()?;
        users
            .find_all()
            .await?
            .into_iter()
            .map(UserRecord::from_document)
            .collect()
    }

    /// Looks a user up by username, then by id.
    ///
    /// When both are given the id lookup runs second and its outcome replaces
    /// the username lookup's, even when the id matches nothing.
    pub async fn get_user(
        &self,
        username: Option<&str>,
        uid: Option<&RecordId>,
    ) -> Result<Option<UserRecord>, UserError> {
        let users = self.collection()?;
        let mut found = None;
        if let Some(username) = username.filter(|u| !u.is_empty()) {
            found = users.find_one(&Filter::username(username)).await?;
        }
        if let Some(uid) = uid {
            found = users.find_one(&Filter::id(*uid)).await?;
        }
        found.map(UserRecord::from_document).transpose()
    }

    /// Creates a user. Returns `false` without writing if the username is taken.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        attributes: Attributes,
    ) -> Result<bool, UserError> {
        let users = self.collection()?;
        if username.is_empty() {
            return Err(UserError::InvalidArgument("username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(UserError::InvalidArgument("password must not be empty".into()));
        }

        if self.get_user(Some(username), None).await?.is_some() {
            debug!("User {} already exists", username);
            return Ok(false);
        }

        let hashed = self.hash_password(password).await?;

        let mut document = attributes;
        for reserved in [ID_FIELD, USERNAME_FIELD, PASSWORD_FIELD] {
            document.remove(reserved);
        }
        document.insert(USERNAME_FIELD.to_string(), Value::String(username.to_string()));
        document.insert(PASSWORD_FIELD.to_string(), Value::String(hashed));

        let id = users.insert_one(document).await?;
        info!("Created user {} ({})", username, id);
        Ok(true)
    }

    /// Applies attribute changes to an existing user, one store write per change.
    ///
    /// Returns `false` with no effect if the username does not exist, `true`
    /// otherwise, whether or not any change altered the record.
    pub async fn update_user(
        &self,
        username: &str,
        changes: &AttributeChanges,
    ) -> Result<bool, UserError> {
        let users = self.collection()?;
        let Some(user) = self.get_user(Some(username), None).await? else {
            debug!("Cannot update unknown user {}", username);
            return Ok(false);
        };

        // Resolve everything up front so a rejected change writes nothing.
        let mut writes = Vec::with_capacity(changes.len());
        for (name, change) in changes.iter() {
            writes.push(self.resolve_write(&user, name, change).await?);
        }

        for write in writes {
            match write {
                FieldWrite::Set(name, value) => {
                    users.set_field(&user.id, &name, value).await?;
                    debug!("Set {} on user {}", name, username);
                }
                FieldWrite::Unset(name) => {
                    users.unset_field(&user.id, &name).await?;
                    debug!("Removed {} from user {}", name, username);
                }
                FieldWrite::Skip(name) => {
                    debug!("User {} has no {} to remove", username, name);
                }
            }
        }

        info!("Updated user {} ({} changes)", username, changes.len());
        Ok(true)
    }

    async fn resolve_write(
        &self,
        user: &UserRecord,
        name: &str,
        change: &AttributeChange,
    ) -> Result<FieldWrite, UserError> {
        let protected = |reason: &str| UserError::ProtectedField(format!("{}: {}", name, reason));

        match (name, change) {
            (ID_FIELD, _) => Err(protected("record id is assigned by the store")),
            (USERNAME_FIELD | PASSWORD_FIELD, AttributeChange::Delete) => {
                Err(protected("cannot be removed"))
            }
            (USERNAME_FIELD | PASSWORD_FIELD, AttributeChange::Set(value)) => {
                let text = match value.as_str() {
                    Some(text) if !text.is_empty() => text,
                    _ => return Err(protected("must be a non-empty string")),
                };
                let stored = if name == PASSWORD_FIELD {
                    self.hash_password(text).await?
                } else {
                    text.to_string()
                };
                Ok(FieldWrite::Set(name.to_string(), Value::String(stored)))
            }
            (_, AttributeChange::Delete) if user.has_field(name) => {
                Ok(FieldWrite::Unset(name.to_string()))
            }
            (_, AttributeChange::Delete) => Ok(FieldWrite::Skip(name.to_string())),
            (_, AttributeChange::Set(value)) => {
                Ok(FieldWrite::Set(name.to_string(), value.clone()))
            }
        }
    }

    /// Deletes a user found the same way as [`get_user`](Self::get_user) and
    /// returns the record as it was read just before removal.
    pub async fn delete_user(
        &self,
        username: Option<&str>,
        uid: Option<&RecordId>,
    ) -> Result<Option<UserRecord>, UserError> {
        let users = self.collection()?;
        let user = self.get_user(username, uid).await?;
        if let Some(user) = &user {
            users.delete_one(&user.id).await?;
            info!("Deleted user {} ({})", user.username, user.id);
        }
        Ok(user)
    }

    /// Checks a username/password pair. Unknown users and wrong passwords
    /// both yield `false`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, UserError> {
        let Some(user) = self.get_user(Some(username), None).await? else {
            return Ok(false);
        };
        self.verify_password(password, user.password).await
    }

    async fn hash_password(&self, password: &str) -> Result<String, UserError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| HashError::Backend(e.to_string()))??;
        Ok(hashed)
    }

    async fn verify_password(&self, password: &str, hashed: String) -> Result<bool, UserError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| HashError::Backend(e.to_string()))??;
        Ok(matched)
    }
}
