//! Database layer for ailogistics-server
//!
//! This module defines the account store trait and its SQLite implementation.

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteDatabase;

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{Account, NewAccount};

/// Account store
///
/// Enforces uniqueness of `username` and `email` atomically at write time.
/// A rejected insert surfaces as `DbError::UniqueViolation`, naming the
/// colliding field when the backend reports it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Database: Send + Sync {
    /// Insert a new account and return the stored record
    async fn insert_account(&self, account: &NewAccount) -> Result<Account, DbError>;

    /// Look up an account by email
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError>;

    /// List every account
    async fn list_accounts(&self) -> Result<Vec<Account>, DbError>;
}
