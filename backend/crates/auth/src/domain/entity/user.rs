//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{UserId, UserName, UserPassword};

/// Registered account
///
/// The password hash never leaves the crate through the HTTP layer; DTOs pick
/// the public fields explicitly.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique on its canonical form
    pub user_name: UserName,
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_name: UserName, password_hash: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            user_name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
