//! SQLite implementation of the Database trait
//!
//! This module provides a SQLite-based implementation of the Database trait
//! using rusqlite and tokio-rusqlite for async operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{ErrorCode, OptionalExtension};
use tokio_rusqlite::Connection;

use super::migrations::CREATE_SCHEMA;
use super::Database;
use crate::error::DbError;
use crate::models::{Account, AccountField, NewAccount};

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, company_name, created_at, updated_at";

/// SQLite database implementation
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Open a SQLite database connection and run migrations
    ///
    /// Use `:memory:` for in-memory database or a file path for persistent storage.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let conn = Connection::open(path).await?;

        conn.call(|conn| {
            conn.execute_batch(CREATE_SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(|e: rusqlite::Error| DbError::Migration(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Create a new in-memory database (useful for testing)
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::new(":memory:").await
    }

    /// Close the database
    ///
    /// Lets SQLite refresh its query planner statistics before the
    /// connection is dropped.
    pub async fn close(self) -> Result<(), DbError> {
        self.conn
            .call(|conn| conn.execute_batch("PRAGMA optimize;"))
            .await?;
        drop(self.conn);
        Ok(())
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn insert_account(&self, account: &NewAccount) -> Result<Account, DbError> {
        let username = account.username.clone();
        let email = account.email.clone();
        let password_hash = account.password_hash.clone();
        let company_name = account.company_name.clone();
        let now = Utc::now();
        let timestamp = now.to_rfc3339();

        let result = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO accounts
                    (username, email, password_hash, company_name, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                    "#,
                    rusqlite::params![username, email, password_hash, company_name, timestamp],
                )?;
                Ok(Account {
                    id: conn.last_insert_rowid(),
                    username,
                    email,
                    password_hash,
                    company_name,
                    created_at: now,
                    updated_at: now,
                })
            })
            .await;

        result.map_err(classify_error)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError> {
        let email = email.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM accounts WHERE email = ?1",
                    ACCOUNT_COLUMNS
                ))?;

                let result = stmt.query_row([&email], account_from_row).optional()?;

                Ok::<_, rusqlite::Error>(result)
            })
            .await
            .map_err(Into::into)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, DbError> {
        self.conn
            .call(|conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {} FROM accounts ORDER BY id", ACCOUNT_COLUMNS))?;

                let accounts = stmt
                    .query_map([], account_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok::<_, rusqlite::Error>(accounts)
            })
            .await
            .map_err(Into::into)
    }
}

/// Map a row selected with `ACCOUNT_COLUMNS` to an Account
fn account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    let created_at = parse_datetime(row.get::<_, Option<String>>(5)?).unwrap_or_else(Utc::now);
    let updated_at = parse_datetime(row.get::<_, Option<String>>(6)?).unwrap_or(created_at);

    Ok(Account {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        company_name: row.get(4)?,
        created_at,
        updated_at,
    })
}

/// Turn a rusqlite error into a DbError, recognizing unique-index rejections
///
/// SQLite reports them as `UNIQUE constraint failed: accounts.<column>`.
fn classify_error(err: rusqlite::Error) -> DbError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.code == ErrorCode::ConstraintViolation
            && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        {
            let field = message.as_deref().and_then(unique_violation_field);
            return DbError::UniqueViolation(field);
        }
    }
    DbError::Sqlite(err)
}

/// Extract the colliding field from a SQLite unique-constraint message
fn unique_violation_field(message: &str) -> Option<AccountField> {
    let columns = message.strip_prefix("UNIQUE constraint failed: ")?;

    // Composite indexes list several columns; only a single column is unambiguous
    let mut fields = columns
        .split(',')
        .map(|c| c.trim().trim_start_matches("accounts."));
    let first = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    AccountField::from_column(first)
}

/// Parse a datetime string to DateTime<Utc>
fn parse_datetime(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                // Try parsing SQLite's datetime format
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|dt| dt.and_utc())
            })
    })
}
