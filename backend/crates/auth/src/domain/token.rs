//! Access tokens
//!
//! What the rest of the crate knows about tokens. The signing scheme lives in
//! `infra::jwt`; handlers and middleware only see these traits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entity::user::User;
use crate::domain::value_object::UserId;
use crate::error::AuthResult;

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Signed claim set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id (UUID)
    pub sub: String,
    /// User name at issue time
    pub name: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl AccessClaims {
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

/// Freshly issued token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,
}

pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> AuthResult<IssuedToken>;
}

/// Given a raw token string, the validated claims or a typed failure
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError>;
}
