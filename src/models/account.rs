//! Account domain models
//!
//! This module defines the stored account record and the non-secret
//! projections that are safe to hand back to clients.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user identity as stored in the database
///
/// Deliberately not `Serialize`: the password hash must never leave the
/// service through a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Store-generated identifier
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Unique email address, used for login lookups
    pub email: String,

    /// One-way salted hash of the password (bcrypt or argon2id)
    pub password_hash: String,

    /// Company the account belongs to
    pub company_name: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Projection returned after a successful login
    pub fn summary(&self) -> AccountSummary {
        AccountSummary::from(self)
    }

    /// Projection returned by account enumeration
    pub fn listing(&self) -> AccountListing {
        AccountListing::from(self)
    }
}

/// Insert payload for a new account
///
/// Carries the hash, never the plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub company_name: String,
}

impl NewAccount {
    /// Create a new insert payload
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        company_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            company_name: company_name.into(),
        }
    }
}

/// Non-secret view of an account returned on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub company_name: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            company_name: account.company_name.clone(),
        }
    }
}

/// Non-secret view of an account returned by enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountListing {
    pub username: String,
    pub email: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountListing {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username.clone(),
            email: account.email.clone(),
            company_name: account.company_name.clone(),
            created_at: account.created_at,
        }
    }
}

/// Uniquely indexed account columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    Username,
    Email,
}

impl AccountField {
    /// Column name in the `accounts` table
    pub fn column(&self) -> &'static str {
        match self {
            AccountField::Username => "username",
            AccountField::Email => "email",
        }
    }

    /// Resolve a column name back to a field
    pub fn from_column(column: &str) -> Option<Self> {
        match column {
            "username" => Some(AccountField::Username),
            "email" => Some(AccountField::Email),
            _ => None,
        }
    }
}

impl fmt::Display for AccountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        let now = Utc::now();
        Account {
            id: 7,
            username: "alice".to_string(),
            email: "alice@co.com".to_string(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".to_string(),
            company_name: "Acme".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summary_serializes_without_hash() {
        let summary = sample_account().summary();
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["username"], "alice");
        assert_eq!(value["email"], "alice@co.com");
        assert_eq!(value["companyName"], "Acme");

        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(!obj.contains_key("passwordHash"));
        assert!(!obj.contains_key("password"));
    }

    #[test]
    fn test_listing_serializes_expected_fields() {
        let account = sample_account();
        let value = serde_json::to_value(account.listing()).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["companyName", "createdAt", "email", "username"]);
    }

    #[test]
    fn test_account_field_column_roundtrip() {
        for field in [AccountField::Username, AccountField::Email] {
            assert_eq!(AccountField::from_column(field.column()), Some(field));
        }
        assert_eq!(AccountField::from_column("company_name"), None);
        assert_eq!(AccountField::Email.to_string(), "email");
    }
}
