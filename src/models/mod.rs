//! Domain models for ailogistics-server
//!
//! This module contains the core domain models used throughout the application.

pub mod account;

pub use account::{Account, AccountField, AccountListing, AccountSummary, NewAccount};
