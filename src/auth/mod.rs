//! Account authentication for ailogistics-server
//!
//! This module provides:
//! - Password hashing and verification (bcrypt, Argon2id)
//! - The credential service for registration, login and enumeration

pub mod password;
pub mod service;

pub use password::{HashAlgorithm, HashError, PasswordHasher};
pub use service::{AccountService, Registration};
