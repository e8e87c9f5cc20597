//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use sqlx::PgPool;
use uuid::Uuid;

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
    UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique violation to a domain conflict, anything else passes through
fn conflict_or(err: sqlx::Error, conflict: AuthError) -> AuthError {
    if is_unique_violation(&err) {
        conflict
    } else {
        AuthError::Database(err)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

const USER_COLUMNS: &str = "user_id, user_name, password_hash, created_at, updated_at";

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                user_name,
                user_name_canonical,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_name.original())
        .bind(user.user_name.canonical())
        .bind(user.password_hash.as_phc_string())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or(e, AuthError::UserNameTaken))?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name_canonical = $1"
        ))
        .bind(user_name.canonical())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_name_canonical = $1)",
        )
        .bind(user_name.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_all(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, user_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for PgAuthRepository {
    async fn create(&self, role: &Role) -> AuthResult<()> {
        sqlx::query("INSERT INTO roles (role_id, role_name, created_at) VALUES ($1, $2, $3)")
            .bind(role.role_id.as_uuid())
            .bind(role.role_name.as_str())
            .bind(role.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_or(e, AuthError::RoleNameTaken))?;

        Ok(())
    }

    async fn find_by_id(&self, role_id: &RoleId) -> AuthResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT role_id, role_name, created_at FROM roles WHERE role_id = $1",
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RoleRow::into_role))
    }

    async fn find_by_name(&self, role_name: &RoleName) -> AuthResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT role_id, role_name, created_at FROM roles WHERE role_name = $1",
        )
        .bind(role_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RoleRow::into_role))
    }

    async fn find_all(&self) -> AuthResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            "SELECT role_id, role_name, created_at FROM roles ORDER BY created_at, role_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RoleRow::into_role).collect())
    }
}

// ============================================================================
// Privilege Repository Implementation
// ============================================================================

impl PrivilegeRepository for PgAuthRepository {
    async fn create(&self, privilege: &Privilege) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO privileges (privilege_id, privilege_name, description, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(privilege.privilege_id.as_uuid())
        .bind(privilege.privilege_name.as_str())
        .bind(privilege.description.as_deref())
        .bind(privilege.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or(e, AuthError::PrivilegeNameTaken))?;

        Ok(())
    }

    async fn find_by_id(&self, privilege_id: &PrivilegeId) -> AuthResult<Option<Privilege>> {
        let row = sqlx::query_as::<_, PrivilegeRow>(
            r#"
            SELECT privilege_id, privilege_name, description, created_at
            FROM privileges
            WHERE privilege_id = $1
            "#,
        )
        .bind(privilege_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PrivilegeRow::into_privilege))
    }

    async fn find_by_name(
        &self,
        privilege_name: &PrivilegeName,
    ) -> AuthResult<Option<Privilege>> {
        let row = sqlx::query_as::<_, PrivilegeRow>(
            r#"
            SELECT privilege_id, privilege_name, description, created_at
            FROM privileges
            WHERE privilege_name = $1
            "#,
        )
        .bind(privilege_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PrivilegeRow::into_privilege))
    }

    async fn find_all(&self) -> AuthResult<Vec<Privilege>> {
        let rows = sqlx::query_as::<_, PrivilegeRow>(
            r#"
            SELECT privilege_id, privilege_name, description, created_at
            FROM privileges
            ORDER BY created_at, privilege_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PrivilegeRow::into_privilege).collect())
    }
}

// ============================================================================
// Role-Privilege Repository Implementation
// ============================================================================

impl RolePrivilegeRepository for PgAuthRepository {
    async fn create(&self, role_privilege: &RolePrivilege) -> AuthResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO role_privileges (role_id, privilege_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (role_id, privilege_id) DO NOTHING
            "#,
        )
        .bind(role_privilege.role_id.as_uuid())
        .bind(role_privilege.privilege_id.as_uuid())
        .bind(role_privilege.created_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted == 1)
    }

    async fn exists(&self, role_id: &RoleId, privilege_id: &PrivilegeId) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM role_privileges WHERE role_id = $1 AND privilege_id = $2)",
        )
        .bind(role_id.as_uuid())
        .bind(privilege_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_role_id(&self, role_id: &RoleId) -> AuthResult<Vec<RolePrivilege>> {
        let rows = sqlx::query_as::<_, RolePrivilegeRow>(
            r#"
            SELECT role_id, privilege_id, created_at
            FROM role_privileges
            WHERE role_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RolePrivilegeRow::into_role_privilege).collect())
    }

    async fn find_all(&self) -> AuthResult<Vec<RolePrivilege>> {
        let rows = sqlx::query_as::<_, RolePrivilegeRow>(
            "SELECT role_id, privilege_id, created_at FROM role_privileges ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RolePrivilegeRow::into_role_privilege).collect())
    }
}

// ============================================================================
// User-Role Repository Implementation
// ============================================================================

impl UserRoleRepository for PgAuthRepository {
    async fn create(&self, user_role: &UserRole) -> AuthResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_role.user_id.as_uuid())
        .bind(user_role.role_id.as_uuid())
        .bind(user_role.created_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted == 1)
    }

    async fn exists(&self, user_id: &UserId, role_id: &RoleId) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_roles WHERE user_id = $1 AND role_id = $2)",
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Vec<UserRole>> {
        let rows = sqlx::query_as::<_, UserRoleRow>(
            r#"
            SELECT user_id, role_id, created_at
            FROM user_roles
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserRoleRow::into_user_role).collect())
    }

    async fn find_all(&self) -> AuthResult<Vec<UserRole>> {
        let rows = sqlx::query_as::<_, UserRoleRow>(
            "SELECT user_id, role_id, created_at FROM user_roles ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserRoleRow::into_user_role).collect())
    }
}

// ============================================================================
// Login History Repository Implementation
// ============================================================================

const LOGIN_HISTORY_COLUMNS: &str =
    "login_history_id, user_id, user_name, succeeded, client_ip, user_agent, attempted_at";

impl LoginHistoryRepository for PgAuthRepository {
    async fn create(&self, entry: &LoginHistory) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO login_histories (
                login_history_id,
                user_id,
                user_name,
                succeeded,
                client_ip,
                user_agent,
                attempted_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.login_history_id.as_uuid())
        .bind(entry.user_id.map(UserId::into_uuid))
        .bind(entry.user_name.as_str())
        .bind(entry.succeeded)
        .bind(entry.client_ip.as_deref())
        .bind(entry.user_agent.as_deref())
        .bind(entry.attempted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &LoginHistoryId) -> AuthResult<Option<LoginHistory>> {
        let row = sqlx::query_as::<_, LoginHistoryRow>(&format!(
            "SELECT {LOGIN_HISTORY_COLUMNS} FROM login_histories WHERE login_history_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LoginHistoryRow::into_login_history))
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Vec<LoginHistory>> {
        let rows = sqlx::query_as::<_, LoginHistoryRow>(&format!(
            "SELECT {LOGIN_HISTORY_COLUMNS} FROM login_histories \
             WHERE user_id = $1 ORDER BY attempted_at DESC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(LoginHistoryRow::into_login_history)
            .collect())
    }

    async fn find_all(&self) -> AuthResult<Vec<LoginHistory>> {
        let rows = sqlx::query_as::<_, LoginHistoryRow>(&format!(
            "SELECT {LOGIN_HISTORY_COLUMNS} FROM login_histories ORDER BY attempted_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(LoginHistoryRow::into_login_history)
            .collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            user_name: UserName::from_db(self.user_name),
            password_hash: UserPassword::from_db(self.password_hash)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    role_id: Uuid,
    role_name: String,
    created_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_role(self) -> Role {
        Role {
            role_id: RoleId::from_uuid(self.role_id),
            role_name: RoleName::from_db(self.role_name),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PrivilegeRow {
    privilege_id: Uuid,
    privilege_name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl PrivilegeRow {
    fn into_privilege(self) -> Privilege {
        Privilege {
            privilege_id: PrivilegeId::from_uuid(self.privilege_id),
            privilege_name: PrivilegeName::from_db(self.privilege_name),
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RolePrivilegeRow {
    role_id: Uuid,
    privilege_id: Uuid,
    created_at: DateTime<Utc>,
}

impl RolePrivilegeRow {
    fn into_role_privilege(self) -> RolePrivilege {
        RolePrivilege {
            role_id: RoleId::from_uuid(self.role_id),
            privilege_id: PrivilegeId::from_uuid(self.privilege_id),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRoleRow {
    user_id: Uuid,
    role_id: Uuid,
    created_at: DateTime<Utc>,
}

impl UserRoleRow {
    fn into_user_role(self) -> UserRole {
        UserRole {
            user_id: UserId::from_uuid(self.user_id),
            role_id: RoleId::from_uuid(self.role_id),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LoginHistoryRow {
    login_history_id: Uuid,
    user_id: Option<Uuid>,
    user_name: String,
    succeeded: bool,
    client_ip: Option<String>,
    user_agent: Option<String>,
    attempted_at: DateTime<Utc>,
}

impl LoginHistoryRow {
    fn into_login_history(self) -> LoginHistory {
        LoginHistory {
            login_history_id: LoginHistoryId::from_uuid(self.login_history_id),
            user_id: self.user_id.map(UserId::from_uuid),
            user_name: self.user_name,
            succeeded: self.succeeded,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            attempted_at: self.attempted_at,
        }
    }
}
