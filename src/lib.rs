//! ailogistics-server - Account credential service for the AI logistics dashboard
//!
//! This crate provides an HTTP backend that registers dashboard accounts,
//! authenticates them by email and password, and lists registered accounts.
//! Passwords are stored only as salted one-way hashes.

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
