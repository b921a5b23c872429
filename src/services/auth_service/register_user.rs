use serde::Serialize;
use tokio::sync::broadcast;

use super::events::AuthEvent;
use super::verify_user::{session_response, LoginResponse};
use crate::error::AppError;
use crate::models::api::RegisterRequest;
use crate::models::database::UserMetadata;
use crate::supabase::{SignUpOutcome, SupabaseClient};

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub confirmation_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<LoginResponse>,
}

/// Creates an account with name and phone stored as user metadata.
pub async fn register_user(
    client: &SupabaseClient,
    events: &broadcast::Sender<AuthEvent>,
    request: &RegisterRequest,
) -> Result<RegisterResponse, AppError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest("email and password are required".to_string()));
    }
    let metadata = UserMetadata {
        name: request.name.clone().filter(|n| !n.trim().is_empty()),
        phone: request.phone.clone().filter(|p| !p.trim().is_empty()),
    };

    match client.sign_up(email, &request.password, &metadata).await? {
        SignUpOutcome::Session(session) => Ok(RegisterResponse {
            confirmation_required: false,
            session: Some(session_response(client, events, session).await),
        }),
        SignUpOutcome::PendingConfirmation(user) => {
            log::info!("user {} registered, awaiting email confirmation", user.id);
            Ok(RegisterResponse {
                confirmation_required: true,
                session: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::database::Role;
    use crate::test_support::FakeBackend;

    #[tokio::test]
    async fn new_account_is_a_public_user() {
        let backend = FakeBackend::start().await;
        let (events, _) = broadcast::channel(4);
        let request = RegisterRequest {
            email: "ravi@example.com".to_string(),
            password: "pw".to_string(),
            name: Some("Ravi".to_string()),
            phone: Some(" ".to_string()),
        };

        let response = register_user(&backend.client(), &events, &request).await.unwrap();
        let session = response.session.unwrap();
        assert!(!response.confirmation_required);
        assert_eq!(session.role, Some(Role::PublicUser));
        assert_eq!(session.user.user_metadata.name.as_deref(), Some("Ravi"));
        assert_eq!(session.user.user_metadata.phone, None);
    }

    #[tokio::test]
    async fn rejects_blank_credentials() {
        let backend = FakeBackend::start().await;
        let (events, _) = broadcast::channel(4);
        let request = RegisterRequest {
            email: " ".to_string(),
            password: String::new(),
            name: None,
            phone: None,
        };
        let err = register_user(&backend.client(), &events, &request).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
