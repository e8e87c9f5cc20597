//! Auth Middleware
//!
//! Bearer token check for protected routes. Verification itself is behind
//! [`TokenVerifier`], so this layer only deals with HTTP.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::{HeaderMap, Request, header, request::Parts};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::token::TokenVerifier;
use crate::domain::value_object::UserId;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Caller identity, inserted into request extensions by
/// [`require_bearer_token`]
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub user_name: String,
    /// Token expiry (unix seconds)
    pub expires_at: i64,
}

/// Middleware that requires a valid bearer token
pub async fn require_bearer_token(
    State(state): State<AuthMiddlewareState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = {
        let token = bearer_token(req.headers())
            .ok_or_else(|| AuthError::Unauthorized("missing bearer token".to_string()))?;
        state.verifier.verify(token)?
    };

    let user = AuthenticatedUser {
        user_id: claims.user_id()?,
        user_name: claims.name,
        expires_at: claims.exp,
    };

    tracing::debug!(user_id = %user.user_id, "Bearer token accepted");
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Token from `Authorization: Bearer <token>` (scheme is case-insensitive)
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AuthError::Unauthorized("missing authentication".to_string()))
    }
}
