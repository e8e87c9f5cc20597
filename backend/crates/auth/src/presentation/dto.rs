//! API DTOs (Data Transfer Objects)
//!
//! Wire format is camelCase JSON. Request types holding a password do not
//! implement `Debug`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{AssignOutput, GrantOutput, LoginOutput, RegisterOutput, SeedOutput};
use crate::domain::entity::{LoginHistory, Privilege, Role, User};
use crate::domain::value_object::{LoginHistoryId, PrivilegeId, RoleId, UserId};

// ============================================================================
// Auth
// ============================================================================

/// Register request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub password: String,
}

/// Register response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub user_name: String,
}

impl From<RegisterOutput> for RegisterResponse {
    fn from(output: RegisterOutput) -> Self {
        Self {
            user_id: output.user_id,
            user_name: output.user_name,
        }
    }
}

/// Login request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub access_token: String,
    pub token_type: String,
    /// Seconds
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

impl From<LoginOutput> for LoginResponse {
    fn from(output: LoginOutput) -> Self {
        Self {
            user_id: output.user_id,
            user_name: output.user_name,
            access_token: output.token.access_token,
            token_type: output.token.token_type.to_string(),
            expires_in: output.token.expires_in,
            expires_at: output.token.expires_at,
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// Public view of a user (no password hash)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            user_name: user.user_name.original().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginHistoryResponse {
    pub login_history_id: LoginHistoryId,
    pub succeeded: bool,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

impl From<LoginHistory> for LoginHistoryResponse {
    fn from(entry: LoginHistory) -> Self {
        Self {
            login_history_id: entry.login_history_id,
            succeeded: entry.succeeded,
            client_ip: entry.client_ip,
            user_agent: entry.user_agent,
            attempted_at: entry.attempted_at,
        }
    }
}

// ============================================================================
// Roles and privileges
// ============================================================================

/// `?name=` of GET /role/create-role
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoleQuery {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub role_id: RoleId,
    pub role_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            role_id: role.role_id,
            role_name: role.role_name.as_str().to_string(),
            created_at: role.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivilegeResponse {
    pub privilege_id: PrivilegeId,
    pub privilege_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Privilege> for PrivilegeResponse {
    fn from(privilege: Privilege) -> Self {
        Self {
            privilege_id: privilege.privilege_id,
            privilege_name: privilege.privilege_name.as_str().to_string(),
            description: privilege.description,
            created_at: privilege.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePrivilegeRequest {
    pub role_id: RoleId,
    pub privilege_ids: Vec<PrivilegeId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePrivilegeResponse {
    pub role_id: RoleId,
    /// Newly granted
    pub granted: Vec<PrivilegeId>,
    /// Already held by the role
    pub skipped: Vec<PrivilegeId>,
}

impl From<GrantOutput> for CreateRolePrivilegeResponse {
    fn from(output: GrantOutput) -> Self {
        Self {
            role_id: output.role_id,
            granted: output.granted,
            skipped: output.skipped,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserRoleRequest {
    pub user_id: UserId,
    pub role_id: RoleId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserRoleResponse {
    pub user_id: UserId,
    pub role_id: RoleId,
    pub created: bool,
}

impl From<AssignOutput> for AssignUserRoleResponse {
    fn from(output: AssignOutput) -> Self {
        Self {
            user_id: output.user_id,
            role_id: output.role_id,
            created: output.created,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialPermissionResponse {
    pub privileges_created: usize,
    pub roles_created: usize,
    pub grants_created: usize,
}

impl From<SeedOutput> for InitialPermissionResponse {
    fn from(output: SeedOutput) -> Self {
        Self {
            privileges_created: output.privileges_created,
            roles_created: output.roles_created,
            grants_created: output.grants_created,
        }
    }
}
