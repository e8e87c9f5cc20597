//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::sqlx_error_kind, kind::ErrorKind};
use platform::password::PasswordPolicyError;
use thiserror::Error;

use crate::domain::token::TokenError;
use crate::domain::value_object::{
    PrivilegeId, PrivilegeNameError, RoleNameError, UserNameError,
};

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or policy-violating input
    #[error("{0}")]
    Validation(String),

    /// Unknown user name or wrong password (deliberately indistinguishable)
    #[error("Invalid user name or password")]
    InvalidCredentials,

    /// Missing, malformed or expired bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("User name already exists")]
    UserNameTaken,

    #[error("Role name already exists")]
    RoleNameTaken,

    #[error("Privilege name already exists")]
    PrivilegeNameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Role not found")]
    RoleNotFound,

    #[error("Privilege not found: {}", join_ids(.0))]
    PrivilegeNotFound(Vec<PrivilegeId>),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_ids(ids: &[PrivilegeId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::Validation,
            AuthError::InvalidCredentials | AuthError::Unauthorized(_) => {
                ErrorKind::Unauthorized
            }
            AuthError::UserNameTaken
            | AuthError::RoleNameTaken
            | AuthError::PrivilegeNameTaken => ErrorKind::Conflict,
            AuthError::UserNotFound
            | AuthError::RoleNotFound
            | AuthError::PrivilegeNotFound(_) => ErrorKind::NotFound,
            AuthError::Database(e) => sqlx_error_kind(e),
            AuthError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convert to AppError. Server-side details stay out of the message.
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::Database(e) => AppError::from(e),
            AuthError::Internal(msg) => {
                AppError::internal("Internal server error").with_source(InternalDetail(msg))
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Unauthorized(reason) => {
                tracing::warn!(reason = %reason, "Rejected bearer token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct InternalDetail(String);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<UserNameError> for AuthError {
    fn from(err: UserNameError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<PasswordPolicyError> for AuthError {
    fn from(err: PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<RoleNameError> for AuthError {
    fn from(err: RoleNameError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<PrivilegeNameError> for AuthError {
    fn from(err: PrivilegeNameError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Unauthorized(err.to_string())
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(AppError::from(rejection).message().to_string())
    }
}

impl From<QueryRejection> for AuthError {
    fn from(rejection: QueryRejection) -> Self {
        AuthError::Validation(AppError::from(rejection).message().to_string())
    }
}
