//! User-Role association

use chrono::{DateTime, Utc};

use crate::domain::value_object::{RoleId, UserId};

/// Unique per (user_id, role_id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRole {
    pub user_id: UserId,
    pub role_id: RoleId,
    pub created_at: DateTime<Utc>,
}

impl UserRole {
    pub fn new(user_id: UserId, role_id: RoleId) -> Self {
        Self {
            user_id,
            role_id,
            created_at: Utc::now(),
        }
    }
}
