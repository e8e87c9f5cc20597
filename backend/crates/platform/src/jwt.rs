//! JSON Web Tokens (HS256)
//!
//! Thin typed wrapper over `jsonwebtoken`. Claim types are supplied by the
//! caller; this module only knows about signing, expiry and failure kinds.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Token encode/decode failures
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),

    #[error("Token has expired")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed")]
    Malformed,
}

/// HS256 key pair derived from a shared secret
#[derive(Clone)]
pub struct Hs256Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256Keys {
    /// Build keys from a shared secret; expiry is checked with zero leeway
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign claims
    pub fn encode<C: Serialize>(&self, claims: &C) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(JwtError::Encoding)
    }

    /// Verify signature and expiry, then deserialize claims
    pub fn decode<C: DeserializeOwned>(&self, token: &str) -> Result<C, JwtError> {
        decode::<C>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => JwtError::Expired,
                JwtErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed,
            })
    }
}

impl std::fmt::Debug for Hs256Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hs256Keys").field("secret", &"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-testing-minimum-32-chars";

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        exp: i64,
    }

    fn claims_expiring_in(secs: i64) -> TestClaims {
        TestClaims {
            sub: "user-1".to_string(),
            exp: chrono::Utc::now().timestamp() + secs,
        }
    }

    #[test]
    fn test_encode_and_decode() {
        let keys = Hs256Keys::new(SECRET);
        let claims = claims_expiring_in(60);

        let token = keys.encode(&claims).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded: TestClaims = keys.decode(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_expired_token() {
        let keys = Hs256Keys::new(SECRET);
        let token = keys.encode(&claims_expiring_in(-10)).unwrap();

        let result = keys.decode::<TestClaims>(&token);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_wrong_secret() {
        let token = Hs256Keys::new(SECRET)
            .encode(&claims_expiring_in(60))
            .unwrap();

        let result = Hs256Keys::new(b"another-secret").decode::<TestClaims>(&token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_garbage_token() {
        let keys = Hs256Keys::new(SECRET);
        assert!(matches!(
            keys.decode::<TestClaims>("invalid.token.here"),
            Err(JwtError::Malformed)
        ));
        assert!(matches!(
            keys.decode::<TestClaims>(""),
            Err(JwtError::Malformed)
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", Hs256Keys::new(SECRET));
        assert!(!debug.contains("test-secret"));
    }
}
