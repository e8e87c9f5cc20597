//! User Name Value Object
//!
//! The login handle. Case is kept for display, uniqueness is decided on the
//! lowercase canonical form.
//!
//! ## Rules (after NFKC + trim)
//! - 3 to 30 characters of `a-z 0-9 _ . - +`
//! - starts and ends with a letter, digit or `_`
//! - no `..`, at least one letter or digit
//! - not a reserved word

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 30;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-', '+'];

/// Names that would be confusing in logs, audit trails or URLs
const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "superuser",
    "support",
    "api",
    "auth",
    "login",
    "logout",
    "register",
    "user",
    "users",
    "role",
    "roles",
    "privilege",
    "privileges",
    "null",
    "undefined",
    "anonymous",
    "guest",
    "me",
    "self",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name cannot be empty")]
    Empty,

    #[error("User name is too short ({length} chars, minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("User name is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("Invalid character '{ch}' in user name. Only a-z, 0-9, _, ., -, + are allowed")]
    InvalidCharacter { ch: char },

    #[error("User name must start and end with a letter, digit or '_'")]
    InvalidBoundary,

    #[error("User name cannot contain consecutive dots (..)")]
    ConsecutiveDots,

    #[error("User name must contain at least one letter or digit")]
    NoAlphanumeric,

    #[error("'{0}' is a reserved user name")]
    Reserved(String),
}

/// Validated user name
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UserName {
    /// Trimmed, NFKC-normalized input (case preserved)
    original: String,
    /// Lowercase form, unique across users
    canonical: String,
}

impl UserName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original = input
            .as_ref()
            .nfkc()
            .collect::<String>()
            .trim()
            .to_string();
        let canonical = original.to_lowercase();
        Self::validate(&canonical)?;
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Rebuild from a stored value (already validated on the way in)
    pub fn from_db(original: impl Into<String>) -> Self {
        let original = original.into();
        let canonical = original.to_lowercase();
        Self {
            original,
            canonical,
        }
    }

    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    fn validate(canonical: &str) -> Result<(), UserNameError> {
        if canonical.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = canonical.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        if let Some(ch) = canonical.chars().find(|&c| !is_valid_char(c)) {
            return Err(UserNameError::InvalidCharacter { ch });
        }

        let boundary_ok = |c: Option<char>| c.is_some_and(is_valid_boundary_char);
        if !boundary_ok(canonical.chars().next()) || !boundary_ok(canonical.chars().next_back())
        {
            return Err(UserNameError::InvalidBoundary);
        }

        if canonical.contains("..") {
            return Err(UserNameError::ConsecutiveDots);
        }

        if !canonical.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(UserNameError::NoAlphanumeric);
        }

        if RESERVED_WORDS.contains(&canonical) {
            return Err(UserNameError::Reserved(canonical.to_string()));
        }

        Ok(())
    }
}

#[inline]
fn is_valid_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&c)
}

#[inline]
fn is_valid_boundary_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.original).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod normalization {
        use super::*;

        #[test]
        fn test_trim_and_case() {
            let name = UserName::new("  AlIcE_123  ").unwrap();
            assert_eq!(name.original(), "AlIcE_123");
            assert_eq!(name.canonical(), "alice_123");
        }

        #[test]
        fn test_nfkc_normalization() {
            // full-width 'Ａ' (U+FF21) becomes ASCII
            let name = UserName::new("Ａlice").unwrap();
            assert_eq!(name.canonical(), "alice");
        }

        #[test]
        fn test_from_db_keeps_case() {
            let name = UserName::from_db("Alice");
            assert_eq!(name.original(), "Alice");
            assert_eq!(name.canonical(), "alice");
            assert_eq!(name.to_string(), "Alice");
        }
    }

    mod length {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert_eq!(UserName::new("   "), Err(UserNameError::Empty));
        }

        #[test]
        fn test_too_short() {
            assert_eq!(
                UserName::new("ab"),
                Err(UserNameError::TooShort { length: 2, min: 3 })
            );
        }

        #[test]
        fn test_bounds() {
            assert!(UserName::new("abc").is_ok());
            assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
            assert!(matches!(
                UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)),
                Err(UserNameError::TooLong { .. })
            ));
        }
    }

    mod characters {
        use super::*;

        #[test]
        fn test_allowed_specials() {
            for ok in ["alice_bob", "alice.bob", "alice-bob", "alice+tag", "_alice", "7zip"] {
                assert!(UserName::new(ok).is_ok(), "{ok} should be accepted");
            }
        }

        #[test]
        fn test_invalid_characters() {
            assert_eq!(
                UserName::new("alice@bob"),
                Err(UserNameError::InvalidCharacter { ch: '@' })
            );
            assert!(matches!(
                UserName::new("alice bob"),
                Err(UserNameError::InvalidCharacter { ch: ' ' })
            ));
            assert!(matches!(
                UserName::new("日本語"),
                Err(UserNameError::InvalidCharacter { .. })
            ));
        }

        #[test]
        fn test_boundaries() {
            for bad in [".alice", "-alice", "+alice", "alice.", "alice-", "alice+"] {
                assert_eq!(
                    UserName::new(bad),
                    Err(UserNameError::InvalidBoundary),
                    "{bad} should be rejected"
                );
            }
        }

        #[test]
        fn test_patterns() {
            assert_eq!(
                UserName::new("alice..bob"),
                Err(UserNameError::ConsecutiveDots)
            );
            assert_eq!(UserName::new("___"), Err(UserNameError::NoAlphanumeric));
        }
    }

    #[test]
    fn test_reserved_case_insensitive() {
        assert_eq!(
            UserName::new("ADMIN"),
            Err(UserNameError::Reserved("admin".to_string()))
        );
        assert!(UserName::new("administrators").is_ok());
    }
}
