use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { user_id: Uuid },
    SignedOut { user_id: Uuid },
}

impl AuthEvent {
    pub fn is_sign_out_of(&self, user: Uuid) -> bool {
        matches!(self, AuthEvent::SignedOut { user_id } if *user_id == user)
    }
}

pub fn publish(sender: &broadcast::Sender<AuthEvent>, event: AuthEvent) {
    // No receivers just means nobody is watching a live view right now.
    if sender.send(event).is_err() {
        log::debug!("auth event {:?} had no listeners", event);
    }
}
