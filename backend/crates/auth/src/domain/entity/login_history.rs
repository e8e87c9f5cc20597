//! Login History Entity
//!
//! Append-only audit trail of login attempts. Rows are written for every
//! attempt and never updated or deleted by the application.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{LoginHistoryId, UserId};

#[derive(Debug, Clone)]
pub struct LoginHistory {
    pub login_history_id: LoginHistoryId,
    /// `None` when the submitted user name matched no account
    pub user_id: Option<UserId>,
    /// User name exactly as submitted (trimmed)
    pub user_name: String,
    pub succeeded: bool,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

impl LoginHistory {
    pub fn new(
        user_id: Option<UserId>,
        user_name: impl Into<String>,
        succeeded: bool,
        client_ip: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            login_history_id: LoginHistoryId::new(),
            user_id,
            user_name: user_name.into(),
            succeeded,
            client_ip,
            user_agent,
            attempted_at: Utc::now(),
        }
    }
}
