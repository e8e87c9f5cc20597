//! Role Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{RoleId, RoleName};

#[derive(Debug, Clone)]
pub struct Role {
    pub role_id: RoleId,
    pub role_name: RoleName,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(role_name: RoleName) -> Self {
        Self {
            role_id: RoleId::new(),
            role_name,
            created_at: Utc::now(),
        }
    }
}
