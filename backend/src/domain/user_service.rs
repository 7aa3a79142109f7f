//! Account management and login.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    IssuedToken, PasswordHashError, PasswordHasher, Principal, TokenError, TokenService,
    UserRepository,
};
use crate::domain::record_service::{RecordService, map_repository_error};
use crate::domain::{
    Email, Error, PasswordHash, Record, Role, User, UserDraft, UserId, UserPatch,
    validate_password,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";
const BOOTSTRAP_ADMIN_NAME: &str = "Administrator";

/// Input for registering a user.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password: Zeroizing<String>,
    pub role: Role,
}

/// Partial update for a user; a supplied password is re-hashed.
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password: Option<Zeroizing<String>>,
    pub role: Option<Role>,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub user: User,
}

/// User use-cases on top of the user repository, hasher and token ports.
#[derive(Clone)]
pub struct UserService {
    records: RecordService<User, dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

fn map_blocking_error(error: tokio::task::JoinError) -> Error {
    Error::internal(format!("password hashing task failed: {error}"))
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Invalid { .. } => Error::unauthorized("invalid or expired token"),
        TokenError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
    }
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            records: RecordService::new(users, clock),
            hasher,
            tokens,
        }
    }

    fn repo(&self) -> &Arc<dyn UserRepository> {
        self.records.repository()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, Error> {
        self.repo()
            .find_by_email(email)
            .await
            .map_err(|err| map_repository_error(User::LABEL, err))
    }

    async fn ensure_email_free(&self, email: &Email, owner: Option<UserId>) -> Result<(), Error> {
        match self.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(Error::conflict("email already registered"))
            }
            _ => Ok(()),
        }
    }

    /// Argon2 is CPU-bound, so hashing runs on the blocking pool.
    async fn hash_password(&self, password: &str) -> Result<PasswordHash, Error> {
        validate_password(password).map_err(|err| Error::invalid_request(err.to_string()))?;
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(map_blocking_error)?
            .map_err(map_hash_error)
    }

    async fn verify_password(&self, password: &str, hash: &PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(map_blocking_error)?
            .map_err(map_hash_error)
    }

    /// Register a user. Duplicate emails are rejected with `409`.
    pub async fn create(&self, new_user: NewUser) -> Result<User, Error> {
        self.ensure_email_free(&new_user.email, None).await?;
        let password_hash = self.hash_password(&new_user.password).await?;
        self.records
            .create(UserDraft {
                name: new_user.name,
                email: new_user.email,
                password_hash,
                role: new_user.role,
            })
            .await
    }

    pub async fn list(&self) -> Result<Vec<User>, Error> {
        self.records.list().await
    }

    pub async fn get(&self, id: &UserId) -> Result<User, Error> {
        self.records.get(id).await
    }

    /// Apply a partial update, re-hashing a new password.
    pub async fn update(&self, id: &UserId, update: UserUpdate) -> Result<User, Error> {
        if let Some(email) = &update.email {
            self.ensure_email_free(email, Some(*id)).await?;
        }
        let password_hash = match update.password.as_deref() {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };
        self.records
            .update(
                id,
                UserPatch {
                    name: update.name,
                    email: update.email,
                    password_hash,
                    role: update.role,
                },
            )
            .await
    }

    pub async fn delete(&self, id: &UserId) -> Result<(), Error> {
        self.records.delete(id).await
    }

    pub async fn delete_all(&self) -> Result<u64, Error> {
        self.records.delete_all().await
    }

    /// Check credentials and issue a bearer token.
    ///
    /// Unknown emails and wrong passwords produce the same `401` message.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, Error> {
        let Ok(email) = Email::parse(email) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(user) = self.find_by_email(&email).await? else {
            info!("login rejected for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let matches = self.verify_password(password, &user.password_hash).await?;
        if !matches {
            info!(user_id = %user.id, "login rejected for wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        let token = self
            .tokens
            .issue(Principal {
                user_id: user.id,
                role: user.role,
            })
            .map_err(map_token_error)?;
        info!(user_id = %user.id, role = %user.role, "login succeeded");
        Ok(LoginOutcome { token, user })
    }

    /// Verify a bearer token and return the caller.
    pub fn authenticate(&self, token: &str) -> Result<Principal, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }

    /// Create an admin account when no users exist yet.
    ///
    /// Returns the created user, or `None` when accounts already exist.
    pub async fn bootstrap_admin(
        &self,
        email: Email,
        password: Zeroizing<String>,
    ) -> Result<Option<User>, Error> {
        let count = self
            .repo()
            .count()
            .await
            .map_err(|err| map_repository_error(User::LABEL, err))?;
        if count > 0 {
            return Ok(None);
        }
        let admin = self
            .create(NewUser {
                name: BOOTSTRAP_ADMIN_NAME.to_owned(),
                email,
                password,
                role: Role::Admin,
            })
            .await?;
        warn!(user_id = %admin.id, "bootstrap admin account created");
        Ok(Some(admin))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
