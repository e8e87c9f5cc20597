//! In-memory repository implementation
//!
//! Keeps every table behind one `parking_lot::RwLock`. Used by tests and by
//! development runs without a database; nothing survives a restart.
//!
//! Enforces the same uniqueness rules as the PostgreSQL schema: canonical
//! user names, role names and privilege names are unique, association pairs
//! are unique.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;

use crate::domain::entity::{
    login_history::LoginHistory, privilege::Privilege, role::Role,
    role_privilege::RolePrivilege, user::User, user_role::UserRole,
};
use crate::domain::repository::{
    LoginHistoryRepository, PrivilegeRepository, RolePrivilegeRepository, RoleRepository,
    UserRepository, UserRoleRepository,
};
use crate::domain::value_object::{
    LoginHistoryId, PrivilegeId, PrivilegeName, RoleId, RoleName, UserId, UserName,
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    roles: HashMap<RoleId, Role>,
    privileges: HashMap<PrivilegeId, Privilege>,
    role_privileges: Vec<RolePrivilege>,
    role_privilege_keys: BTreeSet<(RoleId, PrivilegeId)>,
    user_roles: Vec<UserRole>,
    user_role_keys: BTreeSet<(UserId, RoleId)>,
    /// Append order
    login_histories: Vec<LoginHistory>,
}

/// Volatile auth repository
#[derive(Default)]
pub struct InMemoryAuthRepository {
    tables: RwLock<Tables>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Oldest first, ties broken by id so listings are stable
fn sorted_by<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    items
}

/// Newest first
fn newest_first(mut entries: Vec<LoginHistory>) -> Vec<LoginHistory> {
    // reversed first so equal timestamps keep the latest append on top
    entries.reverse();
    entries.sort_by(|a, b| b.attempted_at.cmp(&a.attempted_at));
    entries
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut tables = self.tables.write();
        if tables
            .users
            .values()
            .any(|u| u.user_name.canonical() == user.user_name.canonical())
        {
            return Err(AuthError::UserNameTaken);
        }
        tables.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.tables.read().users.get(user_id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.user_name.canonical() == user_name.canonical())
            .cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .any(|u| u.user_name.canonical() == user_name.canonical()))
    }

    async fn find_all(&self) -> AuthResult<Vec<User>> {
        let users = self.tables.read().users.values().cloned().collect();
        Ok(sorted_by(users, |u: &User| (u.created_at, u.user_id)))
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for InMemoryAuthRepository {
    async fn create(&self, role: &Role) -> AuthResult<()> {
        let mut tables = self.tables.write();
        if tables.roles.values().any(|r| r.role_name == role.role_name) {
            return Err(AuthError::RoleNameTaken);
        }
        tables.roles.insert(role.role_id, role.clone());
        Ok(())
    }

    async fn find_by_id(&self, role_id: &RoleId) -> AuthResult<Option<Role>> {
        Ok(self.tables.read().roles.get(role_id).cloned())
    }

    async fn find_by_name(&self, role_name: &RoleName) -> AuthResult<Option<Role>> {
        Ok(self
            .tables
            .read()
            .roles
            .values()
            .find(|r| &r.role_name == role_name)
            .cloned())
    }

    async fn find_all(&self) -> AuthResult<Vec<Role>> {
        let roles = self.tables.read().roles.values().cloned().collect();
        Ok(sorted_by(roles, |r: &Role| (r.created_at, r.role_name.clone())))
    }
}

// ============================================================================
// Privilege Repository Implementation
// ============================================================================

impl PrivilegeRepository for InMemoryAuthRepository {
    async fn create(&self, privilege: &Privilege) -> AuthResult<()> {
        let mut tables = self.tables.write();
        if tables
            .privileges
            .values()
            .any(|p| p.privilege_name == privilege.privilege_name)
        {
            return Err(AuthError::PrivilegeNameTaken);
        }
        tables
            .privileges
            .insert(privilege.privilege_id, privilege.clone());
        Ok(())
    }

    async fn find_by_id(&self, privilege_id: &PrivilegeId) -> AuthResult<Option<Privilege>> {
        Ok(self.tables.read().privileges.get(privilege_id).cloned())
    }

    async fn find_by_name(
        &self,
        privilege_name: &PrivilegeName,
    ) -> AuthResult<Option<Privilege>> {
        Ok(self
            .tables
            .read()
            .privileges
            .values()
            .find(|p| &p.privilege_name == privilege_name)
            .cloned())
    }

    async fn find_all(&self) -> AuthResult<Vec<Privilege>> {
        let privileges = self.tables.read().privileges.values().cloned().collect();
        Ok(sorted_by(privileges, |p: &Privilege| {
            (p.created_at, p.privilege_name.clone())
        }))
    }
}

// ============================================================================
// Role-Privilege Repository Implementation
// ============================================================================

impl RolePrivilegeRepository for InMemoryAuthRepository {
    async fn create(&self, role_privilege: &RolePrivilege) -> AuthResult<bool> {
        let mut tables = self.tables.write();
        let key = (role_privilege.role_id, role_privilege.privilege_id);
        if !tables.role_privilege_keys.insert(key) {
            return Ok(false);
        }
        tables.role_privileges.push(role_privilege.clone());
        Ok(true)
    }

    async fn exists(&self, role_id: &RoleId, privilege_id: &PrivilegeId) -> AuthResult<bool> {
        Ok(self
            .tables
            .read()
            .role_privilege_keys
            .contains(&(*role_id, *privilege_id)))
    }

    async fn find_by_role_id(&self, role_id: &RoleId) -> AuthResult<Vec<RolePrivilege>> {
        Ok(self
            .tables
            .read()
            .role_privileges
            .iter()
            .filter(|rp| &rp.role_id == role_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> AuthResult<Vec<RolePrivilege>> {
        Ok(self.tables.read().role_privileges.clone())
    }
}

// ============================================================================
// User-Role Repository Implementation
// ============================================================================

impl UserRoleRepository for InMemoryAuthRepository {
    async fn create(&self, user_role: &UserRole) -> AuthResult<bool> {
        let mut tables = self.tables.write();
        let key = (user_role.user_id, user_role.role_id);
        if !tables.user_role_keys.insert(key) {
            return Ok(false);
        }
        tables.user_roles.push(user_role.clone());
        Ok(true)
    }

    async fn exists(&self, user_id: &UserId, role_id: &RoleId) -> AuthResult<bool> {
        Ok(self
            .tables
            .read()
            .user_role_keys
            .contains(&(*user_id, *role_id)))
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Vec<UserRole>> {
        Ok(self
            .tables
            .read()
            .user_roles
            .iter()
            .filter(|ur| &ur.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> AuthResult<Vec<UserRole>> {
        Ok(self.tables.read().user_roles.clone())
    }
}

// ============================================================================
// Login History Repository Implementation
// ============================================================================

impl LoginHistoryRepository for InMemoryAuthRepository {
    async fn create(&self, entry: &LoginHistory) -> AuthResult<()> {
        self.tables.write().login_histories.push(entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &LoginHistoryId) -> AuthResult<Option<LoginHistory>> {
        Ok(self
            .tables
            .read()
            .login_histories
            .iter()
            .find(|h| &h.login_history_id == id)
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Vec<LoginHistory>> {
        let entries = self
            .tables
            .read()
            .login_histories
            .iter()
            .filter(|h| h.user_id.as_ref() == Some(user_id))
            .cloned()
            .collect();
        Ok(newest_first(entries))
    }

    async fn find_all(&self) -> AuthResult<Vec<LoginHistory>> {
        let entries = self.tables.read().login_histories.clone();
        Ok(newest_first(entries))
    }
}
