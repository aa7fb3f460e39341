use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::auth::{password, token};
use crate::error::ApiError;
use crate::models::user::{Role, User};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be between 3-30 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User fields echoed back with a freshly issued token.
#[derive(Debug, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    pub token: String,
}

fn auth_response(user: User) -> Result<AuthResponse, ApiError> {
    let token = token::issue(user.id, user.role).map_err(|e| {
        tracing::error!("token issue failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    Ok(AuthResponse {
        user: AuthUser {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        },
        token,
    })
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    body.validate()?;

    if User::email_exists(&state.pool, &body.email).await? {
        return Err(ApiError::bad_request("Email already in use"));
    }

    let hash = password::hash_password(&body.password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal_server_error("Failed to create user")
    })?;

    let role = body.role.unwrap_or(Role::User);
    let user = User::create(&state.pool, &body.username, &body.email, &hash, role).await?;

    Ok((StatusCode::CREATED, Json(auth_response(user)?)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    body.validate()?;

    let user = User::find_by_email(&state.pool, &body.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !password::verify_password(&body.password, &user.password) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    Ok(Json(auth_response(user)?))
}

/// POST /api/auth/logout
///
/// Tokens are stateless and expire on their own; there is no revocation
/// list, so logout acknowledges and does nothing.
pub async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logged out successfully" }))
}
