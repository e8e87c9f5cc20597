//! Entity identifiers

use kernel::id::{Id, markers};

pub type UserId = Id<markers::User>;
pub type RoleId = Id<markers::Role>;
pub type PrivilegeId = Id<markers::Privilege>;
pub type LoginHistoryId = Id<markers::LoginHistory>;
