//! Privilege Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{PrivilegeId, PrivilegeName};

/// A single permission, granted to users through roles
#[derive(Debug, Clone)]
pub struct Privilege {
    pub privilege_id: PrivilegeId,
    pub privilege_name: PrivilegeName,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Privilege {
    pub fn new(privilege_name: PrivilegeName, description: Option<String>) -> Self {
        Self {
            privilege_id: PrivilegeId::new(),
            privilege_name,
            description,
            created_at: Utc::now(),
        }
    }
}
