//! Entity Module

pub mod login_history;
pub mod privilege;
pub mod role;
pub mod role_privilege;
pub mod user;
pub mod user_role;

pub use login_history::LoginHistory;
pub use privilege::Privilege;
pub use role::Role;
pub use role_privilege::RolePrivilege;
pub use user::User;
pub use user_role::UserRole;
