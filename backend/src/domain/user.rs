//! User accounts.

use std::fmt;

use chrono::{DateTime, Utc};

use super::ids::UserId;
use super::record::{Record, replace};
use super::role::Role;

/// Validation errors for user fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// Normalised, lower-cased email address.
///
/// # Examples
/// ```
/// use odonto_backend::domain::Email;
///
/// let email = Email::parse(" Perito@Example.ORG ").expect("valid email");
/// assert_eq!(email.as_str(), "perito@example.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an address.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let normalised = raw.trim().to_lowercase();
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || normalised.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Wrap a value already normalised by storage.
    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimum accepted plaintext password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Check a plaintext password before hashing.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// PHC-formatted password hash. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Registered account able to call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a [`User`]; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub role: Role,
}

/// Partial update for a [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password_hash: Option<PasswordHash>,
    pub role: Option<Role>,
}

impl Record for User {
    type Id = UserId;
    type Draft = UserDraft;
    type Patch = UserPatch;

    const LABEL: &'static str = "user";

    fn create(id: UserId, draft: UserDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            password_hash: draft.password_hash,
            role: draft.role,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UserPatch, now: DateTime<Utc>) {
        replace(&mut self.name, patch.name);
        replace(&mut self.email, patch.email);
        replace(&mut self.password_hash, patch.password_hash);
        replace(&mut self.role, patch.role);
        self.updated_at = now;
    }

    fn id(&self) -> UserId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
