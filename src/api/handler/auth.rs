use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::api::extract::{CurrentUser, MaybeUser};
use crate::error::AppError;
use crate::models::api::{LoginRequest, RegisterRequest, StatusResponse};
use crate::models::AppState;
use crate::services::auth_service::{
    register_user, resolve_role, sign_out_user, verify_user_credentials, LoginResponse,
    RegisterResponse, SessionSummary,
};

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = verify_user_credentials(&state.supabase, &state.auth_events, &payload).await?;
    Ok(Json(response))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let response = register_user(&state.supabase, &state.auth_events, &payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: CurrentUser,
) -> Result<Json<StatusResponse>, AppError> {
    sign_out_user(
        &state.supabase,
        &state.auth_events,
        &session.user,
        &session.access_token,
    )
    .await?;
    Ok(Json(StatusResponse::success().redirect("/")))
}

pub async fn session(
    State(state): State<Arc<AppState>>,
    MaybeUser(session): MaybeUser,
) -> Json<SessionSummary> {
    match session {
        Some(session) => {
            let role = resolve_role(&state.supabase, session.user.id, &session.access_token).await;
            Json(SessionSummary::for_user(&session.user, role))
        }
        None => Json(SessionSummary::anonymous()),
    }
}
