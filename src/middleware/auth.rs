use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::token::{self, Principal};
use crate::error::ApiError;
use crate::models::user::Role;

/// Bearer-token authentication middleware.
///
/// Extracts the token from the Authorization header, verifies it, and
/// injects the resolved [`Principal`] into the request extensions. Every
/// verification failure is reported uniformly so callers cannot distinguish
/// malformed, forged, and expired tokens.
pub async fn authenticate(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let principal = token::verify(&token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Static role-allowlist check for an operation. Must run after
/// [`authenticate`]; a missing principal means the layers are misordered
/// and is treated as unauthenticated.
pub async fn require_roles(
    allowed: &'static [Role],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !allowed.contains(&principal.role) {
        return Err(ApiError::forbidden("Insufficient permissions"));
    }

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header.
fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_yields_none() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        assert_eq!(extract_bearer(&headers_with("Basic dXNlcjpwYXNz")), None);
    }

    #[test]
    fn empty_token_is_rejected() {
        assert_eq!(extract_bearer(&headers_with("Bearer   ")), None);
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(
            extract_bearer(&headers_with("Bearer abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
    }
}
