//! Ports for password hashing and bearer token handling.

use chrono::{DateTime, Utc};

use crate::domain::{PasswordHash, Role, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        Malformed { message: String } => "stored password hash is malformed: {message}",
    }
}

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token is missing, malformed, forged or expired.
        Invalid { message: String } => "invalid token: {message}",
        /// Signing failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a PHC string.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}

/// Identity and role extracted from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

/// A freshly signed bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// Issues and verifies stateless bearer tokens.
pub trait TokenService: Send + Sync {
    /// Sign a token for `principal`.
    fn issue(&self, principal: Principal) -> Result<IssuedToken, TokenError>;

    /// Verify signature and expiry and return the embedded principal.
    fn verify(&self, token: &str) -> Result<Principal, TokenError>;
}
