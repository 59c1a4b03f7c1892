//! Account credential service
//!
//! Registration hashes the password and relies on the store's unique
//! indexes to reject duplicates. Authentication looks the account up by
//! email and verifies the password against the stored hash. Both run the
//! expensive hashing work on the blocking thread pool.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::database::Database;
use crate::error::AccountError;
use crate::models::{Account, AccountListing, AccountSummary, NewAccount};

use super::password::{HashError, PasswordHasher};

/// Password hashed once to give unknown-email logins the same cost as real ones
const DUMMY_PASSWORD: &str = "ailogistics-dummy-password";

/// Registration input as received from the HTTP layer
#[derive(Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
}

impl Registration {
    /// Create a registration request
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        company_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            company_name: company_name.into(),
        }
    }

    /// Names of the fields that are empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
            ("companyName", &self.company_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("company_name", &self.company_name)
            .finish()
    }
}

/// Credential service
///
/// Owns the accounts collection. Holds no mutable state between calls
/// apart from the dummy hash computed at construction.
pub struct AccountService<D: Database> {
    db: Arc<D>,
    hasher: PasswordHasher,
    dummy_hash: String,
}

impl<D: Database> AccountService<D> {
    /// Create a new credential service over the given store
    ///
    /// Hashes the dummy password up front, so this costs one hash with the
    /// configured work factor.
    pub fn new(db: Arc<D>, hasher: PasswordHasher) -> Result<Self, HashError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD).map_err(|e| {
            error!(error = %e, "Failed to compute dummy password hash");
            e
        })?;

        Ok(Self {
            db,
            hasher,
            dummy_hash,
        })
    }

    /// Register a new account
    ///
    /// Duplicates are detected only through the store's rejection of the
    /// insert; there is no separate existence check.
    pub async fn register(&self, registration: Registration) -> Result<Account, AccountError> {
        let missing = registration.missing_fields();
        if !missing.is_empty() {
            return Err(AccountError::Validation(format!(
                "missing fields: {}",
                missing.join(", ")
            )));
        }

        let Registration {
            username,
            email,
            password,
            company_name,
        } = registration;

        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::Internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        let new_account = NewAccount::new(username, email, password_hash, company_name);

        match self.db.insert_account(&new_account).await {
            Ok(account) => {
                info!(
                    account_id = account.id,
                    username = %account.username,
                    "Account registered"
                );
                Ok(account)
            }
            Err(e) => {
                let err = AccountError::from(e);
                if err.is_duplicate() {
                    debug!(username = %new_account.username, error = %err, "Registration rejected");
                } else {
                    error!(error = %err, "Registration failed");
                }
                Err(err)
            }
        }
    }

    /// Authenticate by email and password
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountSummary, AccountError> {
        let account = self.db.find_account_by_email(email).await.map_err(|e| {
            error!(error = %e, "Account lookup failed");
            AccountError::Internal(e.to_string())
        })?;

        let (stored_hash, account) = match account {
            Some(account) => (account.password_hash.clone(), Some(account)),
            None => (self.dummy_hash.clone(), None),
        };

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let verified =
            tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
                .await
                .map_err(|e| AccountError::Internal(format!("verification task failed: {}", e)))?;

        match account {
            Some(account) if verified => {
                info!(account_id = account.id, "Login succeeded");
                Ok(account.summary())
            }
            _ => {
                debug!("Login rejected");
                Err(AccountError::InvalidCredentials)
            }
        }
    }

    /// List all accounts without credential fields
    pub async fn list_accounts(&self) -> Result<Vec<AccountListing>, AccountError> {
        let accounts = self.db.list_accounts().await.map_err(|e| {
            error!(error = %e, "Listing accounts failed");
            AccountError::Internal(e.to_string())
        })?;

        Ok(accounts.iter().map(AccountListing::from).collect())
    }
}
