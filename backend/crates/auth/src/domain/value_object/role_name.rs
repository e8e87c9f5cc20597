//! Role Name Value Object
//!
//! Roles are referred to by name in configuration (seed grants) and in logs,
//! so the name is normalized to a single lowercase form.

use std::fmt;

use thiserror::Error;

pub const ROLE_NAME_MIN_LENGTH: usize = 2;
pub const ROLE_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleNameError {
    #[error("Role name must be between {min} and {max} characters (got {length})")]
    Length { length: usize, min: usize, max: usize },

    #[error("Invalid character '{0}' in role name. Only a-z, 0-9, _, -, . are allowed")]
    InvalidCharacter(char),

    #[error("Role name must start with a letter or digit")]
    InvalidStart,
}

/// Trimmed, lowercase role name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleName(String);

impl RoleName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, RoleNameError> {
        let value = input.as_ref().trim().to_lowercase();

        let length = value.chars().count();
        if !(ROLE_NAME_MIN_LENGTH..=ROLE_NAME_MAX_LENGTH).contains(&length) {
            return Err(RoleNameError::Length {
                length,
                min: ROLE_NAME_MIN_LENGTH,
                max: ROLE_NAME_MAX_LENGTH,
            });
        }

        if let Some(ch) = value.chars().find(|&c| !is_valid_char(c)) {
            return Err(RoleNameError::InvalidCharacter(ch));
        }

        if !value.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(RoleNameError::InvalidStart);
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
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.')
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
