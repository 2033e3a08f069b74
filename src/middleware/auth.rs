use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, taken from a verified bearer token.
///
/// Handlers that take `AuthUser` only run for authenticated requests; every
/// other request ends in a 401 before the handler body executes. Taking
/// `Result<AuthUser, ApiError>` instead defers the check into the handler so
/// the body can be validated first.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_from_headers(&parts.headers).map_err(reject)?;

        let claims = auth::validate_jwt(token, &state.config.security.jwt_secret)
            .map_err(|e| reject(e.to_string()))?;

        Ok(AuthUser::from(claims))
    }
}

// The reason goes to the log only; clients always see the same message
fn reject(reason: String) -> ApiError {
    tracing::debug!("rejected request: {}", reason);
    ApiError::unauthorized("Unauthorized")
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| "Authorization header must use Bearer token format".to_string())?
        .trim();

    if token.is_empty() {
        return Err("Empty JWT token".to_string());
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_jwt_from_headers(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_and_malformed_headers() {
        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
        assert!(extract_jwt_from_headers(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_jwt_from_headers(&headers("Bearer   ")).is_err());
        assert!(extract_jwt_from_headers(&headers("bearer abc")).is_err());
    }
}
