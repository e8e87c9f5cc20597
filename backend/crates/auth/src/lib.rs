//! Auth (Identity and Access) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and token traits
//! - `application/` - AuthService and RoleService
//! - `infra/` - PostgreSQL and in-memory repositories, JWT token service
//! - `presentation/` - HTTP handlers, DTOs, bearer middleware, router
//!
//! ## Features
//! - Register / login with user name + password, HS256 bearer tokens
//! - Login history for every attempt
//! - Roles, privileges, role-privilege grants and user-role assignment
//! - Idempotent baseline permission seed
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Uniform failure for unknown user and wrong password, with equalized timing
//! - Tokens verified with zero expiry leeway

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAuthRepository, JwtTokenService, PgAuthRepository};
pub use presentation::handlers::route_not_found;
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
