//! Error types
//!
//! Defines domain-specific error types for each module of the credential store.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Document store errors
#[derive(Debug)]
pub enum StoreError {
    IoError(io::Error),
    Serialization(serde_json::Error),
    CorruptCollection(String),
    InvalidCollectionName(String),
    ImmutableId(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
            StoreError::Serialization(e) => write!(f, "Serialization error: {}", e),
            StoreError::CorruptCollection(c) => write!(f, "Corrupt collection: {}", c),
            StoreError::InvalidCollectionName(n) => write!(f, "Invalid collection name: {}", n),
            StoreError::ImmutableId(k) => write!(f, "Field '{}' cannot be modified", k),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(error: io::Error) -> Self {
        StoreError::IoError(error)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Serialization(error)
    }
}

/// Password hashing errors
#[derive(Debug)]
pub enum HashError {
    InvalidCost(u32),
    Backend(String),
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashError::InvalidCost(cost) => {
                write!(f, "Invalid work factor {}: must be between 4 and 31", cost)
            }
            HashError::Backend(msg) => write!(f, "Hashing failed: {}", msg),
        }
    }
}

impl std::error::Error for HashError {}

impl From<bcrypt::BcryptError> for HashError {
    fn from(error: bcrypt::BcryptError) -> Self {
        HashError::Backend(error.to_string())
    }
}

/// Credential store errors
#[derive(Debug)]
pub enum UserError {
    Uninitialized,
    Store(StoreError),
    Hash(HashError),
    CorruptRecord(String),
    ProtectedField(String),
    InvalidArgument(String),
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserError::Uninitialized => write!(f, "Database not initialized"),
            UserError::Store(e) => write!(f, "Store error: {}", e),
            UserError::Hash(e) => write!(f, "Password hash error: {}", e),
            UserError::CorruptRecord(msg) => write!(f, "Corrupt user record: {}", msg),
            UserError::ProtectedField(msg) => write!(f, "Protected field: {}", msg),
            UserError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for UserError {}

impl From<StoreError> for UserError {
    fn from(error: StoreError) -> Self {
        UserError::Store(error)
    }
}

impl From<HashError> for UserError {
    fn from(error: HashError) -> Self {
        UserError::Hash(error)
    }
}

/// Login page errors
#[derive(Debug)]
pub enum LoginPageError {
    InvalidArgument(String),
    NotFound(PathBuf),
    IoError(io::Error),
}

impl fmt::Display for LoginPageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginPageError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            LoginPageError::NotFound(p) => write!(f, "Login page not found: {}", p.display()),
            LoginPageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for LoginPageError {}

/// Top-level error for the command-line tool
#[derive(Debug)]
pub enum AppError {
    Config(config::ConfigError),
    User(UserError),
    Store(StoreError),
    LoginPage(LoginPageError),
    Serialization(serde_json::Error),
    IoError(io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::User(e) => write!(f, "User error: {}", e),
            AppError::Store(e) => write!(f, "Store error: {}", e),
            AppError::LoginPage(e) => write!(f, "Login page error: {}", e),
            AppError::Serialization(e) => write!(f, "Serialization error: {}", e),
            AppError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError::Config(error)
    }
}

impl From<UserError> for AppError {
    fn from(error: UserError) -> Self {
        AppError::User(error)
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        AppError::Store(error)
    }
}

impl From<LoginPageError> for AppError {
    fn from(error: LoginPageError) -> Self {
        AppError::LoginPage(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Serialization(error)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        AppError::IoError(error)
    }
}
