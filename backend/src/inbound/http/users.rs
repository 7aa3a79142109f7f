//! User account handlers and login.
//!
//! ```text
//! POST   /api/user/login {"email":"ana@example.org","password":"..."}
//! POST   /api/user
//! GET    /api/user
//! GET    /api/user/{id}
//! PUT    /api/user/{id}
//! DELETE /api/user/{id}
//! DELETE /api/user
//! ```
//!
//! Everything except login is restricted to administrators.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{NewUser, Role, User, UserId, UserUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{ADMIN_ONLY, Caller};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{
    DeletedAllResponse, DeletedResponse, UserResponse, collect,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, non_blank, parse_email, parse_enum, parse_id, parse_optional_enum, require_text,
};

const USER_LABEL: &str = "user";

/// Body for creating or updating a user. On update every field is optional.
///
/// Example JSON:
/// `{"name":"Ana","email":"ana@example.org","password":"s3cret-pw","role":"perito"}`
#[derive(Default, Deserialize, Serialize, ToSchema)]
pub struct UserRequest {
    pub name: Option<String>,
    #[schema(example = "ana@example.org")]
    pub email: Option<String>,
    /// Plain-text password, at least 8 characters. Stored only as a hash.
    pub password: Option<String>,
    /// One of `admin`, `perito`, `assistente`.
    #[schema(example = "perito")]
    pub role: Option<String>,
}

impl UserRequest {
    fn into_new_user(self) -> ApiResult<NewUser> {
        let name = require_text(self.name, FieldName::new("name"))?;
        let email = require_text(self.email, FieldName::new("email"))?;
        let password = require_text(self.password, FieldName::new("password"))?;
        let role = require_text(self.role, FieldName::new("role"))?;
        Ok(NewUser {
            name,
            email: parse_email(&email, FieldName::new("email"))?,
            password: Zeroizing::new(password),
            role: parse_enum::<Role>(&role, FieldName::new("role"))?,
        })
    }

    fn into_update(self) -> ApiResult<UserUpdate> {
        let email = non_blank(self.email, FieldName::new("email"))?;
        Ok(UserUpdate {
            name: non_blank(self.name, FieldName::new("name"))?,
            email: email
                .map(|raw| parse_email(&raw, FieldName::new("email")))
                .transpose()?,
            password: self.password.map(Zeroizing::new),
            role: parse_optional_enum(self.role, FieldName::new("role"))?,
        })
    }
}

/// Login request body for `POST /api/user/login`.
#[derive(Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ana@example.org")]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires.
    #[schema(example = 3600)]
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "login",
    security(())
)]
#[post("/user/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let email = require_text(email, FieldName::new("email"))?;
    let password = Zeroizing::new(require_text(password, FieldName::new("password"))?);
    let outcome = state.users.login(&email, &password).await?;
    Ok(web::Json(LoginResponse {
        token: outcome.token.token,
        token_type: "Bearer".to_owned(),
        expires_in: outcome.token.expires_in,
        expires_at: outcome.token.expires_at,
        user: UserResponse::from(&outcome.user),
    }))
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/user",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/user")]
pub async fn create_user(
    caller: Caller,
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    caller.require(ADMIN_ONLY)?;
    let user = state.users.create(payload.into_inner().into_new_user()?).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// List every user.
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/user")]
pub async fn list_users(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    caller.require(ADMIN_ONLY)?;
    let users: Vec<User> = state.users.list().await?;
    Ok(web::Json(collect(&users)))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/user/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/user/{id}")]
pub async fn get_user(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    caller.require(ADMIN_ONLY)?;
    let id: UserId = parse_id(&path, FieldName::new("id"))?;
    let user = state.users.get(&id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Update name, email, password or role.
#[utoipa::path(
    put,
    path = "/api/user/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/user/{id}")]
pub async fn update_user(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    caller.require(ADMIN_ONLY)?;
    let id: UserId = parse_id(&path, FieldName::new("id"))?;
    let user = state
        .users
        .update(&id, payload.into_inner().into_update()?)
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Delete one user.
#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "User deleted", body = DeletedResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/user/{id}")]
pub async fn delete_user(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedResponse>> {
    caller.require(ADMIN_ONLY)?;
    let id: UserId = parse_id(&path, FieldName::new("id"))?;
    state.users.delete(&id).await?;
    Ok(web::Json(DeletedResponse::new(USER_LABEL, id)))
}

/// Delete every user.
#[utoipa::path(
    delete,
    path = "/api/user",
    responses(
        (status = 200, description = "Users deleted", body = DeletedAllResponse),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteAllUsers"
)]
#[delete("/user")]
pub async fn delete_all_users(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<DeletedAllResponse>> {
    caller.require(ADMIN_ONLY)?;
    let deleted = state.users.delete_all().await?;
    Ok(web::Json(DeletedAllResponse::new(USER_LABEL, deleted)))
}

#[cfg(test)]
mod tests;
