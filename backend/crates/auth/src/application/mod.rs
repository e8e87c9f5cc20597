//! Application Layer
//!
//! Application services composing the repositories.

pub mod auth_service;
pub mod config;
pub mod role_service;

// Re-exports
pub use auth_service::{AuthService, LoginInput, LoginOutput, RegisterInput, RegisterOutput};
pub use config::{AuthConfig, SeedConfig, SeedPrivilege, SeedRole};
pub use role_service::{AssignOutput, GrantOutput, RoleService, SeedOutput};
