use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::models::api::TokenParams;
use crate::models::database::{AuthUser, Role};
use crate::models::AppState;
use crate::services::auth_service::{current_user, resolve_role};

/// Signed-in user plus the token their backend calls run under.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: AuthUser,
    pub access_token: String,
}

/// Like [`CurrentUser`] but anonymous visitors (or stale tokens) pass through as `None`.
pub struct MaybeUser(pub Option<CurrentUser>);

/// Route guard for admin pages.
pub struct AdminUser(pub CurrentUser);

pub(crate) fn session_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    from_header
        .or_else(|| {
            Query::<TokenParams>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(params)| params.access_token)
        })
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let access_token = session_token(parts).ok_or(AppError::Unauthorized)?;
        let user = current_user(&state.supabase, &access_token).await?;
        Ok(CurrentUser { user, access_token })
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(AppError::Unauthorized) => Ok(MaybeUser(None)),
            Err(e) => Err(e),
        }
    }
}

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        match resolve_role(&state.supabase, current.user.id, &current.access_token).await {
            Some(Role::Admin) => Ok(AdminUser(current)),
            role => {
                log::warn!("user {} ({:?}) refused admin access", current.user.id, role);
                Err(AppError::Forbidden)
            }
        }
    }
}
