use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Caller identity recovered from a verified bearer token. Produced
/// exactly once per request by [`require_auth`] and consumed by handlers
/// through an `Extension` extractor.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { id: claims.sub }
    }
}

/// Bearer-token gate for protected routes.
///
/// Missing header fails the request before the handler runs; a token that
/// does not verify fails with an invalid/expired outcome. No side effects
/// beyond attaching [`AuthUser`] to the request.
pub async fn require_auth(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let claims = auth::verify_token(&token)?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Authorization token is required"))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(ApiError::unauthorized("Authorization header must use Bearer token format")),
    }
}
