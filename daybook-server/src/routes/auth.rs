//! Account endpoints and the Basic-auth extractor

use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{StatusCode, header, request::Parts},
    routing::{get, post, put},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use daybook_core::User;
use serde::Deserialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/login", get(login))
        .route("/users/me/name", put(change_name))
        .route("/users/me/password", put(change_password))
}

/// A request whose Basic credentials match a stored user
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = basic_credentials(parts).ok_or(AppError::Unauthorized)?;
        if !state.store().authenticate_user(&user)? {
            tracing::debug!(user = %user.name, "rejected credentials");
            return Err(AppError::Unauthorized);
        }
        Ok(AuthUser(user))
    }
}

/// Decode `Authorization: Basic base64(name:password)`.
fn basic_credentials(parts: &Parts) -> Option<User> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (name, password) = decoded.split_once(':')?;
    Some(User::new(name, password))
}

/// Request body for registering
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
}

/// POST /users - Create an account
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<StatusCode, AppError> {
    let user = User::new(req.name, req.password);
    if !state.store().create_user(&user)? {
        return Err(AppError::NameTaken(user.name));
    }
    Ok(StatusCode::CREATED)
}

/// GET /login - Check credentials
async fn login(AuthUser(_): AuthUser) -> StatusCode {
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
pub struct ChangeNameRequest {
    pub name: String,
}

/// PUT /users/me/name - Move the account to a new name
async fn change_name(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<ChangeNameRequest>,
) -> Result<StatusCode, AppError> {
    let renamed = user.renamed(req.name);
    if !state.store().update_user_name(&user, &renamed)? {
        return Err(AppError::NameTaken(renamed.name));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
}

/// PUT /users/me/password - Replace the password
async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    let updated = user.with_password(req.password);
    state.store().update_user_password(&user, &updated)?;
    Ok(StatusCode::NO_CONTENT)
}
