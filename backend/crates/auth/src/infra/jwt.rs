//! JWT token service
//!
//! HS256 access tokens over `platform::jwt`.

use chrono::{Duration, Utc};
use platform::jwt::{Hs256Keys, JwtError};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::token::{
    AccessClaims, IssuedToken, TOKEN_TYPE_BEARER, TokenError, TokenIssuer, TokenVerifier,
};
use crate::error::{AuthError, AuthResult};

/// Issues and verifies HS256 access tokens
#[derive(Debug, Clone)]
pub struct JwtTokenService {
    keys: Hs256Keys,
    ttl_secs: i64,
}

impl JwtTokenService {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            keys: Hs256Keys::new(secret),
            ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_secs())
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(&self, user: &User) -> AuthResult<IssuedToken> {
        let issued_at = Utc::now();
        let expires_at = Duration::try_seconds(self.ttl_secs)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                AuthError::Internal(format!("token lifetime out of range: {}s", self.ttl_secs))
            })?;

        let claims = AccessClaims {
            sub: user.user_id.to_string(),
            name: user.user_name.original().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let access_token = self
            .keys
            .encode(&claims)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE_BEARER,
            expires_in: self.ttl_secs,
            expires_at,
        })
    }
}

impl TokenVerifier for JwtTokenService {
    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self.keys.decode(token).map_err(|e| match e {
            JwtError::Expired => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        // subject must be one of our ids
        claims.user_id()?;
        Ok(claims)
    }
}
