use tokio::sync::broadcast;

use crate::config::Config;
use crate::services::auth_service::AuthEvent;
use crate::supabase::{RealtimeClient, SupabaseClient};

pub struct AppState {
    pub config: Config,
    pub supabase: SupabaseClient,
    pub realtime: RealtimeClient,
    pub auth_events: broadcast::Sender<AuthEvent>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let supabase = SupabaseClient::new(&config.supabase);
        let realtime = RealtimeClient::new(&config.supabase);
        let (auth_events, _) = broadcast::channel(64);
        AppState {
            config,
            supabase,
            realtime,
            auth_events,
        }
    }
}
