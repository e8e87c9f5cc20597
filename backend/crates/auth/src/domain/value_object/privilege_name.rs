//! Privilege Name Value Object
//!
//! `resource.action` style identifiers such as `user.read` or
//! `role:grant`.

use std::fmt;

use thiserror::Error;

pub const PRIVILEGE_NAME_MIN_LENGTH: usize = 2;
pub const PRIVILEGE_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrivilegeNameError {
    #[error("Privilege name must be between {min} and {max} characters (got {length})")]
    Length { length: usize, min: usize, max: usize },

    #[error("Invalid character '{0}' in privilege name. Only a-z, 0-9, _, ., :, - are allowed")]
    InvalidCharacter(char),

    #[error("Privilege name must start and end with a letter or digit")]
    InvalidBoundary,
}

/// Trimmed, lowercase privilege name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrivilegeName(String);

impl PrivilegeName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, PrivilegeNameError> {
        let value = input.as_ref().trim().to_lowercase();

        let length = value.chars().count();
        if !(PRIVILEGE_NAME_MIN_LENGTH..=PRIVILEGE_NAME_MAX_LENGTH).contains(&length) {
            return Err(PrivilegeNameError::Length {
                length,
                min: PRIVILEGE_NAME_MIN_LENGTH,
                max: PRIVILEGE_NAME_MAX_LENGTH,
            });
        }

        if let Some(ch) = value.chars().find(|&c| !is_valid_char(c)) {
            return Err(PrivilegeNameError::InvalidCharacter(ch));
        }

        let alnum = |c: char| c.is_ascii_alphanumeric();
        if !value.starts_with(alnum) || !value.ends_with(alnum) {
            return Err(PrivilegeNameError::InvalidBoundary);
        }

        Ok(Self(value))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | ':' | '-')
}

impl fmt::Display for PrivilegeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for ok in ["user.read", "role:grant", "audit_log.export", "v2"] {
            assert!(PrivilegeName::new(ok).is_ok(), "{ok} should be accepted");
        }
        assert_eq!(PrivilegeName::new(" User.Read ").unwrap().as_str(), "user.read");
    }

    #[test]
    fn test_invalid_names() {
        assert!(matches!(
            PrivilegeName::new("x"),
            Err(PrivilegeNameError::Length { .. })
        ));
        assert_eq!(
            PrivilegeName::new("user/read"),
            Err(PrivilegeNameError::InvalidCharacter('/'))
        );
        assert_eq!(
            PrivilegeName::new("user."),
            Err(PrivilegeNameError::InvalidBoundary)
        );
    }
}
