//! Authentication primitives for the todo server.
//!
//! This crate provides:
//! - JWT access token issuance and validation
//! - Bearer header parsing
//! - Salted password hashing and verification

mod error;
mod jwt;
mod password;

pub use error::*;
pub use jwt::*;
pub use password::*;

/// Default JWT expiration time in days.
pub const DEFAULT_JWT_EXPIRATION_DAYS: u64 = 30;

/// Longest accepted JWT lifetime in days.
pub const MAX_JWT_EXPIRATION_DAYS: u64 = 3650;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "todo-server";
