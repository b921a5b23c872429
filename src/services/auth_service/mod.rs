// src/services/auth_service/mod.rs
pub mod events;
pub mod register_user;
pub mod role;
pub mod verify_user;

pub use events::AuthEvent;
pub use register_user::{register_user, RegisterResponse};
pub use role::{resolve_role, SessionSummary};
pub use verify_user::{current_user, sign_out_user, verify_user_credentials, LoginResponse};
