//! User Password Value Object
//!
//! Domain wrappers over `platform::password`.
//!
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//!
//! let raw = RawPassword::new("Correct-Horse-42".to_string()).unwrap();
//! let stored = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(stored.verify(&raw, None));
//! ```

use std::fmt;

use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};

use crate::error::{AuthError, AuthResult};

/// Password as typed by the user, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// A newly chosen password; the policy applies
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }

    /// A password presented at login; only normalized
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Stored password hash (Argon2id PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        raw.inner()
            .hash(pepper)
            .map(Self)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    pub fn from_db(phc: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AuthError::Internal(format!("Stored password hash is unusable: {e}")))
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_applies_to_new_only() {
        assert!(RawPassword::new("short".to_string()).is_err());
        // login attempts are never rejected up front
        let raw = RawPassword::for_login("short".to_string());
        assert!(format!("{raw:?}").contains("REDACTED"));
    }

    #[test]
    fn test_hash_roundtrip_through_db() {
        let raw = RawPassword::new("Correct-Horse-42".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw, Some(b"pepper")).unwrap();

        let reloaded = UserPassword::from_db(stored.as_phc_string()).unwrap();
        let same = RawPassword::for_login("Correct-Horse-42".to_string());
        let other = RawPassword::for_login("Correct-Horse-43".to_string());
        assert!(reloaded.verify(&same, Some(b"pepper")));
        assert!(!reloaded.verify(&other, Some(b"pepper")));
    }

    #[test]
    fn test_from_db_rejects_garbage() {
        assert!(matches!(
            UserPassword::from_db("plaintext"),
            Err(AuthError::Internal(_))
        ));
    }
}
