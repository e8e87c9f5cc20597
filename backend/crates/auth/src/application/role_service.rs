//! Role Service
//!
//! Role creation, role-privilege grants, user-role assignment and the
//! baseline permission seed.
//!
//! Multi-row writes are sequential and not wrapped in a transaction. Every
//! referenced row is resolved before the first write, so a bad reference
//! never leaves a partial grant behind; a storage failure halfway through
//! still can.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{
    privilege::Privilege, role::Role, role_privilege::RolePrivilege, user_role::UserRole,
};
use crate::domain::repository::{
    AuthStore, PrivilegeRepository, RolePrivilegeRepository, RoleRepository, UserRepository,
    UserRoleRepository,
};
use crate::domain::value_object::{PrivilegeId, PrivilegeName, RoleId, RoleName, UserId};
use crate::error::{AuthError, AuthResult};

/// Result of a grant request
#[derive(Debug)]
pub struct GrantOutput {
    pub role_id: RoleId,
    /// Newly associated privileges, in request order
    pub granted: Vec<PrivilegeId>,
    /// Privileges the role already had
    pub skipped: Vec<PrivilegeId>,
}

#[derive(Debug)]
pub struct AssignOutput {
    pub user_id: UserId,
    pub role_id: RoleId,
    /// `false` if the user already had the role
    pub created: bool,
}

/// Rows written by one `initial_permission` run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutput {
    pub privileges_created: usize,
    pub roles_created: usize,
    pub grants_created: usize,
}

/// Role service
pub struct RoleService<R, P, RP, U, UR>
where
    R: RoleRepository,
    P: PrivilegeRepository,
    RP: RolePrivilegeRepository,
    U: UserRepository,
    UR: UserRoleRepository,
{
    role_repo: Arc<R>,
    privilege_repo: Arc<P>,
    role_privilege_repo: Arc<RP>,
    user_repo: Arc<U>,
    user_role_repo: Arc<UR>,
    config: Arc<AuthConfig>,
}

impl<S: AuthStore> RoleService<S, S, S, S, S> {
    /// Service backed by a single store
    pub fn from_store(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            config,
        )
    }
}

impl<R, P, RP, U, UR> RoleService<R, P, RP, U, UR>
where
    R: RoleRepository,
    P: PrivilegeRepository,
    RP: RolePrivilegeRepository,
    U: UserRepository,
    UR: UserRoleRepository,
{
    pub fn new(
        role_repo: Arc<R>,
        privilege_repo: Arc<P>,
        role_privilege_repo: Arc<RP>,
        user_repo: Arc<U>,
        user_role_repo: Arc<UR>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            role_repo,
            privilege_repo,
            role_privilege_repo,
            user_repo,
            user_role_repo,
            config,
        }
    }

    pub async fn create_role(&self, name: &str) -> AuthResult<Role> {
        let role_name = RoleName::new(name)?;

        if self.role_repo.find_by_name(&role_name).await?.is_some() {
            return Err(AuthError::RoleNameTaken);
        }

        let role = Role::new(role_name);
        self.role_repo.create(&role).await?;

        tracing::info!(role_id = %role.role_id, role_name = %role.role_name, "Role created");

        Ok(role)
    }

    /// Grant privileges to a role
    ///
    /// Duplicate ids collapse; pairs that already exist are skipped. Fails
    /// with `RoleNotFound`/`PrivilegeNotFound` before writing anything.
    pub async fn create_role_privilege(
        &self,
        role_id: RoleId,
        mut privilege_ids: Vec<PrivilegeId>,
    ) -> AuthResult<GrantOutput> {
        if privilege_ids.is_empty() {
            return Err(AuthError::Validation(
                "At least one privilege id is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        privilege_ids.retain(|id| seen.insert(*id));

        if self.role_repo.find_by_id(&role_id).await?.is_none() {
            return Err(AuthError::RoleNotFound);
        }

        let mut missing = Vec::new();
        for privilege_id in &privilege_ids {
            if self.privilege_repo.find_by_id(privilege_id).await?.is_none() {
                missing.push(*privilege_id);
            }
        }
        if !missing.is_empty() {
            return Err(AuthError::PrivilegeNotFound(missing));
        }

        let mut granted = Vec::new();
        let mut skipped = Vec::new();
        for privilege_id in privilege_ids {
            let pair = RolePrivilege::new(role_id, privilege_id);
            if self.role_privilege_repo.create(&pair).await? {
                granted.push(privilege_id);
            } else {
                skipped.push(privilege_id);
            }
        }

        tracing::info!(
            role_id = %role_id,
            granted = granted.len(),
            skipped = skipped.len(),
            "Role privileges granted"
        );

        Ok(GrantOutput {
            role_id,
            granted,
            skipped,
        })
    }

    pub async fn assign_user_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AuthResult<AssignOutput> {
        if self.user_repo.find_by_id(&user_id).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }
        if self.role_repo.find_by_id(&role_id).await?.is_none() {
            return Err(AuthError::RoleNotFound);
        }

        let created = self
            .user_role_repo
            .create(&UserRole::new(user_id, role_id))
            .await?;

        if created {
            tracing::info!(user_id = %user_id, role_id = %role_id, "Role assigned to user");
        }

        Ok(AssignOutput {
            user_id,
            role_id,
            created,
        })
    }

    pub async fn list_roles(&self) -> AuthResult<Vec<Role>> {
        self.role_repo.find_all().await
    }

    pub async fn list_privileges(&self) -> AuthResult<Vec<Privilege>> {
        self.privilege_repo.find_all().await
    }

    /// Seed the configured baseline
    ///
    /// Safe to call repeatedly: existing privileges and roles are reused by
    /// name and existing grants are skipped.
    pub async fn initial_permission(&self) -> AuthResult<SeedOutput> {
        let seed = &self.config.seed;

        // validate the whole seed before touching storage
        let mut privileges = Vec::with_capacity(seed.privileges.len());
        for entry in &seed.privileges {
            privileges.push((PrivilegeName::new(&entry.name)?, entry.description.clone()));
        }
        let mut roles = Vec::with_capacity(seed.roles.len());
        for entry in &seed.roles {
            let role_name = RoleName::new(&entry.name)?;
            let mut grants = Vec::with_capacity(entry.privileges.len());
            for name in &entry.privileges {
                let name = PrivilegeName::new(name)?;
                if !privileges.iter().any(|(seeded, _)| *seeded == name) {
                    return Err(AuthError::Internal(format!(
                        "Seed role '{role_name}' grants unseeded privilege '{name}'"
                    )));
                }
                grants.push(name);
            }
            roles.push((role_name, grants));
        }

        let mut output = SeedOutput::default();

        let mut privilege_ids = HashMap::with_capacity(privileges.len());
        for (name, description) in privileges {
            let (privilege_id, created) = self.ensure_privilege(&name, description).await?;
            output.privileges_created += usize::from(created);
            privilege_ids.insert(name, privilege_id);
        }

        for (role_name, grants) in roles {
            let (role_id, created) = self.ensure_role(role_name).await?;
            output.roles_created += usize::from(created);

            for name in grants {
                // every grant name was checked against the seeded list above
                let Some(privilege_id) = privilege_ids.get(&name).copied() else {
                    continue;
                };
                let pair = RolePrivilege::new(role_id, privilege_id);
                if self.role_privilege_repo.create(&pair).await? {
                    output.grants_created += 1;
                }
            }
        }

        tracing::info!(
            privileges_created = output.privileges_created,
            roles_created = output.roles_created,
            grants_created = output.grants_created,
            "Initial permissions seeded"
        );

        Ok(output)
    }

    async fn ensure_privilege(
        &self,
        name: &PrivilegeName,
        description: Option<String>,
    ) -> AuthResult<(PrivilegeId, bool)> {
        if let Some(existing) = self.privilege_repo.find_by_name(name).await? {
            return Ok((existing.privilege_id, false));
        }

        let privilege = Privilege::new(name.clone(), description);
        match self.privilege_repo.create(&privilege).await {
            Ok(()) => Ok((privilege.privilege_id, true)),
            // lost a race with a concurrent seed
            Err(AuthError::PrivilegeNameTaken) => self
                .privilege_repo
                .find_by_name(name)
                .await?
                .map(|p| (p.privilege_id, false))
                .ok_or(AuthError::PrivilegeNameTaken),
            Err(e) => Err(e),
        }
    }

    async fn ensure_role(&self, role_name: RoleName) -> AuthResult<(RoleId, bool)> {
        if let Some(existing) = self.role_repo.find_by_name(&role_name).await? {
            return Ok((existing.role_id, false));
        }

        let role = Role::new(role_name);
        match self.role_repo.create(&role).await {
            Ok(()) => Ok((role.role_id, true)),
            Err(AuthError::RoleNameTaken) => self
                .role_repo
                .find_by_name(&role.role_name)
                .await?
                .map(|r| (r.role_id, false))
                .ok_or(AuthError::RoleNameTaken),
            Err(e) => Err(e),
        }
    }
}
