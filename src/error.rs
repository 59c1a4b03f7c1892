//! Application error types for ailogistics-server
//!
//! This module defines the error taxonomy shared by the credential service
//! and the storage layer. All error types use `thiserror`.

use thiserror::Error;

use crate::models::AccountField;

/// Credential service errors
///
/// These are returned to the HTTP layer, which maps each variant to a
/// user-visible message and status code.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountError {
    /// A required field was missing or empty
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Another account already uses this username
    #[error("Username already exists")]
    DuplicateUsername,

    /// Another account already uses this email
    #[error("Email already exists")]
    DuplicateEmail,

    /// The store rejected the insert as a duplicate without naming the field
    #[error("Username or email already exists")]
    DuplicateCredential,

    /// Unknown email or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Storage or hashing failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// True for the three duplicate-key variants
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            AccountError::DuplicateUsername
                | AccountError::DuplicateEmail
                | AccountError::DuplicateCredential
        )
    }
}

impl From<DbError> for AccountError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(Some(AccountField::Username)) => {
                AccountError::DuplicateUsername
            }
            DbError::UniqueViolation(Some(AccountField::Email)) => AccountError::DuplicateEmail,
            DbError::UniqueViolation(None) => AccountError::DuplicateCredential,
            other => AccountError::Internal(other.to_string()),
        }
    }
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Insert rejected by a unique index; the field is known when the store reports it
    #[error("Unique constraint violated{}", .0.map(|f| format!(" on {}", f)).unwrap_or_default())]
    UniqueViolation(Option<AccountField>),

    /// Record not found
    #[error("Record not found")]
    NotFound,

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),
}
