//! Bearer-token authentication and role allow-lists.
//!
//! [`Caller`] is an extractor: handlers that take it reject requests without a
//! valid `Authorization: Bearer <token>` header with `401`. Role checks run
//! inside the handler through [`Caller::require`] and fail with `403`.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use tracing::{debug, error};

use crate::domain::ports::Principal;
use crate::domain::{Error, Role, UserId};

use super::state::HttpState;

/// Only administrators.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
/// Every authenticated role.
pub const STAFF: &[Role] = &[Role::Admin, Role::Examiner, Role::Assistant];
/// Roles allowed to draft reports with the text generator.
pub const EXAMINERS: &[Role] = &[Role::Admin, Role::Examiner];

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(Principal);

impl Caller {
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    /// Fail with `403` unless the caller's role is in `allowed`.
    pub fn require(&self, allowed: &[Role]) -> Result<(), Error> {
        if allowed.contains(&self.0.role) {
            Ok(())
        } else {
            debug!(user_id = %self.0.user_id, role = %self.0.role, "role not allowed for route");
            Err(Error::forbidden("insufficient permissions for this resource"))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<Caller, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        error!("HttpState is not registered; cannot authenticate");
        return Err(Error::internal("authentication is not configured"));
    };
    let token = bearer_token(req)?;
    state.users.authenticate(token).map(Caller)
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
