//! Role-Privilege association

use chrono::{DateTime, Utc};

use crate::domain::value_object::{PrivilegeId, RoleId};

/// Unique per (role_id, privilege_id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePrivilege {
    pub role_id: RoleId,
    pub privilege_id: PrivilegeId,
    pub created_at: DateTime<Utc>,
}

impl RolePrivilege {
    pub fn new(role_id: RoleId, privilege_id: PrivilegeId) -> Self {
        Self {
            role_id,
            privilege_id,
            created_at: Utc::now(),
        }
    }
}
