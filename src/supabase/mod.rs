pub mod auth;
pub mod client;
pub mod realtime;

pub use auth::SignUpOutcome;
pub use client::SupabaseClient;
pub use realtime::{ChangeFilter, RealtimeClient};
