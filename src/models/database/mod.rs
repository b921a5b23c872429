pub mod session;
pub mod user;

pub use session::Session;
pub use user::{AuthUser, Role, RoleName, UserMetadata, UserProfile, UserRoleRow};
