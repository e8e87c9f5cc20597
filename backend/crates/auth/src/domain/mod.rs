//! Domain Layer
//!
//! Contains entities, value objects, repository and token traits.

pub mod entity;
pub mod repository;
pub mod token;
pub mod value_object;

// Re-exports
pub use entity::{LoginHistory, Privilege, Role, RolePrivilege, User, UserRole};
pub use repository::{
    AuthStore, LoginHistoryRepository, PrivilegeRepository, RolePrivilegeRepository,
    RoleRepository, UserRepository, UserRoleRepository,
};
pub use token::{AccessClaims, IssuedToken, TokenError, TokenIssuer, TokenVerifier};
