//! Value Object Module

pub mod ids;
pub mod privilege_name;
pub mod role_name;
pub mod user_name;
pub mod user_password;

pub use ids::{LoginHistoryId, PrivilegeId, RoleId, UserId};
pub use privilege_name::{PrivilegeName, PrivilegeNameError};
pub use role_name::{RoleName, RoleNameError};
pub use user_name::{UserName, UserNameError};
pub use user_password::{RawPassword, UserPassword};
