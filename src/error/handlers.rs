//! Error handlers
//!
//! Provides error reporting for the command-line tool.

use crate::error::types::{AppError, UserError};
use log::error;

/// Report an application error
pub fn handle_error(err: &AppError) {
    error!("credential-store error: {}", err);
}

/// Convert error to a process exit code
pub fn error_to_exit_code(err: &AppError) -> u8 {
    match err {
        AppError::Config(_) => 78,
        AppError::User(UserError::Uninitialized) => 70,
        AppError::User(UserError::InvalidArgument(_))
        | AppError::User(UserError::ProtectedField(_)) => 65,
        AppError::User(_) => 74,
        AppError::Store(_) => 74,
        AppError::LoginPage(_) => 66,
        AppError::Serialization(_) => 70,
        AppError::IoError(_) => 74,
    }
}
