//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer (PostgreSQL and in-memory).

use crate::domain::entity::{
    login_history::LoginHistory, privilege::Privilege, role::Role,
    role_privilege::RolePrivilege, user::User, user_role::UserRole,
};
use crate::domain::value_object::{
    LoginHistoryId, PrivilegeId, PrivilegeName, RoleId, RoleName, UserId, UserName,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user (`UserNameTaken` on duplicate canonical name)
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Lookup on the canonical form
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// All users, oldest first
    async fn find_all(&self) -> AuthResult<Vec<User>>;
}

/// Role repository trait
#[trait_variant::make(RoleRepository: Send)]
pub trait LocalRoleRepository {
    /// Create a new role (`RoleNameTaken` on duplicate name)
    async fn create(&self, role: &Role) -> AuthResult<()>;

    async fn find_by_id(&self, role_id: &RoleId) -> AuthResult<Option<Role>>;

    async fn find_by_name(&self, role_name: &RoleName) -> AuthResult<Option<Role>>;

    async fn find_all(&self) -> AuthResult<Vec<Role>>;
}

/// Privilege repository trait
#[trait_variant::make(PrivilegeRepository: Send)]
pub trait LocalPrivilegeRepository {
    /// Create a new privilege (`PrivilegeNameTaken` on duplicate name)
    async fn create(&self, privilege: &Privilege) -> AuthResult<()>;

    async fn find_by_id(&self, privilege_id: &PrivilegeId) -> AuthResult<Option<Privilege>>;

    async fn find_by_name(&self, privilege_name: &PrivilegeName) -> AuthResult<Option<Privilege>>;

    async fn find_all(&self) -> AuthResult<Vec<Privilege>>;
}

/// Role-privilege association repository trait
#[trait_variant::make(RolePrivilegeRepository: Send)]
pub trait LocalRolePrivilegeRepository {
    /// Insert the pair. Returns `false` if it already existed.
    async fn create(&self, role_privilege: &RolePrivilege) -> AuthResult<bool>;

    async fn exists(&self, role_id: &RoleId, privilege_id: &PrivilegeId) -> AuthResult<bool>;

    async fn find_by_role_id(&self, role_id: &RoleId) -> AuthResult<Vec<RolePrivilege>>;

    async fn find_all(&self) -> AuthResult<Vec<RolePrivilege>>;
}

/// User-role association repository trait
#[trait_variant::make(UserRoleRepository: Send)]
pub trait LocalUserRoleRepository {
    /// Insert the pair. Returns `false` if it already existed.
    async fn create(&self, user_role: &UserRole) -> AuthResult<bool>;

    async fn exists(&self, user_id: &UserId, role_id: &RoleId) -> AuthResult<bool>;

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Vec<UserRole>>;

    async fn find_all(&self) -> AuthResult<Vec<UserRole>>;
}

/// Login history repository trait (append-only)
#[trait_variant::make(LoginHistoryRepository: Send)]
pub trait LocalLoginHistoryRepository {
    async fn create(&self, entry: &LoginHistory) -> AuthResult<()>;

    async fn find_by_id(&self, id: &LoginHistoryId) -> AuthResult<Option<LoginHistory>>;

    /// Newest first
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Vec<LoginHistory>>;

    /// Newest first
    async fn find_all(&self) -> AuthResult<Vec<LoginHistory>>;
}

/// A storage backend that provides every repository
pub trait AuthStore:
    UserRepository
    + RoleRepository
    + PrivilegeRepository
    + RolePrivilegeRepository
    + UserRoleRepository
    + LoginHistoryRepository
    + Send
    + Sync
    + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository
        + RoleRepository
        + PrivilegeRepository
        + RolePrivilegeRepository
        + UserRoleRepository
        + LoginHistoryRepository
        + Send
        + Sync
        + 'static
{
}
