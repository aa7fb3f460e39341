use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::models::user::Role;

/// Identity resolved from a verified token. Lives for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i64, role: Role) -> Self {
        let expiry_hours = config::config().security.jwt_expiry_hours;
        Self::with_expiry(user_id, role, Duration::hours(expiry_hours as i64))
    }

    pub fn with_expiry(user_id: i64, role: Role, validity: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            role,
            iat: now.timestamp(),
            exp: (now + validity).timestamp(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("token expired")]
    ExpiredToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("signing secret is not configured")]
    MissingSecret,
    #[error("token generation failed: {0}")]
    TokenGeneration(String),
}

/// Issue a signed bearer token for the given identity.
pub fn issue(user_id: i64, role: Role) -> Result<String, AuthError> {
    sign(&Claims::new(user_id, role))
}

pub fn sign(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify a bearer token and resolve the principal it encodes.
///
/// Expiry is checked with zero leeway; any structural or signature problem
/// is reported as `InvalidToken`.
pub fn verify(token: &str) -> Result<Principal, AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let mut validation = Validation::default();
    validation.leeway = 0;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })?;

    Ok(Principal {
        user_id: data.claims.user_id,
        role: data.claims.role,
    })
}
