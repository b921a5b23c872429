use serde::Serialize;
use tokio::sync::broadcast;

use super::events::{publish, AuthEvent};
use super::role::{landing_page, resolve_role};
use crate::error::{AppError, SupabaseError};
use crate::models::api::LoginRequest;
use crate::models::database::{AuthUser, Role, Session};
use crate::supabase::SupabaseClient;

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub user: AuthUser,
    pub role: Option<Role>,
    pub redirect: &'static str,
}

pub(crate) async fn session_response(
    client: &SupabaseClient,
    events: &broadcast::Sender<AuthEvent>,
    session: Session,
) -> LoginResponse {
    let role = resolve_role(client, session.user.id, &session.access_token).await;
    publish(events, AuthEvent::SignedIn { user_id: session.user.id });
    log::info!("user {} signed in as {:?}", session.user.id, role);
    LoginResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        expires_in: session.expires_in,
        user: session.user,
        role,
        redirect: landing_page(role),
    }
}

/// Password sign-in. Access checks for admin pages happen on each admin request, not here.
pub async fn verify_user_credentials(
    client: &SupabaseClient,
    events: &broadcast::Sender<AuthEvent>,
    request: &LoginRequest,
) -> Result<LoginResponse, SupabaseError> {
    let session = client
        .sign_in_with_password(request.email.trim(), &request.password)
        .await?;
    Ok(session_response(client, events, session).await)
}

/// Resolves the bearer token to a user; a rejected token is reported as [`AppError::Unauthorized`].
pub async fn current_user(client: &SupabaseClient, access_token: &str) -> Result<AuthUser, AppError> {
    match client.get_user(access_token).await {
        Ok(user) => Ok(user),
        Err(e) if matches!(e.status(), Some(401) | Some(403)) => Err(AppError::Unauthorized),
        Err(e) => Err(e.into()),
    }
}

pub async fn sign_out_user(
    client: &SupabaseClient,
    events: &broadcast::Sender<AuthEvent>,
    user: &AuthUser,
    access_token: &str,
) -> Result<(), SupabaseError> {
    client.sign_out(access_token).await?;
    publish(events, AuthEvent::SignedOut { user_id: user.id });
    log::info!("user {} signed out", user.id);
    Ok(())
}
