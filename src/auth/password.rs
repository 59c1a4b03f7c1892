//! Password hashing and verification
//!
//! Passwords are stored as salted one-way hashes. bcrypt (cost 10) is the
//! default; Argon2id is available as an alternative. Verification detects
//! the algorithm from the stored hash, so records created under either
//! setting stay verifiable after the configured algorithm changes.

use std::fmt;
use std::str::FromStr;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Smallest work factor bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;

/// Largest work factor bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;

/// Prefix of Argon2id PHC strings
const ARGON2ID_PREFIX: &str = "$argon2id$";

/// Prefixes of bcrypt modular-crypt strings
const BCRYPT_PREFIXES: &[&str] = &["$2a$", "$2b$", "$2x$", "$2y$"];

/// Supported password hashing algorithms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Bcrypt,
    Argon2,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Bcrypt => f.write_str("bcrypt"),
            HashAlgorithm::Argon2 => f.write_str("argon2"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bcrypt" => Ok(HashAlgorithm::Bcrypt),
            "argon2" | "argon2id" => Ok(HashAlgorithm::Argon2),
            other => Err(HashError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Password hasher
///
/// Cheap to clone; carries only the algorithm choice and work factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHasher {
    algorithm: HashAlgorithm,
    bcrypt_cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Bcrypt,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordHasher {
    /// Create a hasher for the given algorithm and bcrypt cost
    ///
    /// The cost must lie in bcrypt's accepted range (4..=31) regardless of
    /// the selected algorithm.
    pub fn new(algorithm: HashAlgorithm, bcrypt_cost: u32) -> Result<Self, HashError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(HashError::InvalidCost(bcrypt_cost));
        }
        Ok(Self {
            algorithm,
            bcrypt_cost,
        })
    }

    /// Algorithm used for new hashes
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// bcrypt work factor used for new hashes
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// Hash a password with a fresh random salt
    ///
    /// # Example
    ///
    /// ```
    /// use ailogistics_server::auth::password::{HashAlgorithm, PasswordHasher};
    ///
    /// let hasher = PasswordHasher::new(HashAlgorithm::Bcrypt, 4).unwrap();
    /// let hash = hasher.hash("secret123").unwrap();
    /// assert!(hash.starts_with("$2b$04$"));
    /// assert!(hasher.verify("secret123", &hash));
    /// ```
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        match self.algorithm {
            HashAlgorithm::Bcrypt => bcrypt::hash(password, self.bcrypt_cost)
                .map_err(|e| HashError::HashFailed(e.to_string())),
            HashAlgorithm::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| HashError::HashFailed(e.to_string()))
            }
        }
    }

    /// Verify a password against a stored hash
    ///
    /// Returns `false` on mismatch and for any hash that cannot be parsed.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match detect_algorithm(hash) {
            Some(HashAlgorithm::Bcrypt) => bcrypt::verify(password, hash).unwrap_or(false),
            Some(HashAlgorithm::Argon2) => {
                let parsed_hash = match PasswordHash::new(hash) {
                    Ok(h) => h,
                    Err(_) => return false,
                };
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok()
            }
            None => false,
        }
    }
}

/// Identify the algorithm that produced a stored hash
pub fn detect_algorithm(hash: &str) -> Option<HashAlgorithm> {
    if hash.starts_with(ARGON2ID_PREFIX) {
        Some(HashAlgorithm::Argon2)
    } else if BCRYPT_PREFIXES.iter().any(|p| hash.starts_with(p)) {
        Some(HashAlgorithm::Bcrypt)
    } else {
        None
    }
}

/// Error type for password hashing operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashError {
    /// Hashing failed
    #[error("Hash failed: {0}")]
    HashFailed(String),

    /// bcrypt cost outside the accepted range
    #[error("Invalid bcrypt cost {0}: must be between 4 and 31")]
    InvalidCost(u32),

    /// Unrecognized algorithm name
    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),
}
