use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::api::StatusResponse;
use crate::services::queue_service::QueueError;

/// Failures talking to the hosted backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("count missing from response")]
    MissingCount,
    #[error("realtime connection failed: {0}")]
    Realtime(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("realtime channel rejected: {0}")]
    ChannelRejected(String),
}

impl SupabaseError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SupabaseError::Api { status, .. } => Some(*status),
            SupabaseError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// PostgREST answers 406 when a single-object read matched no row.
    pub fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404) | Some(406))
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("sign in required")]
    Unauthorized,
    #[error("admin access required")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Backend(#[from] SupabaseError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Queue(_) => StatusCode::CONFLICT,
            AppError::Backend(e) => match e.status() {
                Some(code) if (400..500).contains(&code) => {
                    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                _ => StatusCode::BAD_GATEWAY,
            },
        };

        if status.is_server_error() {
            log::error!("request failed: {}", self);
        }

        let body = StatusResponse::error(self.to_string());
        let body = match self {
            AppError::Unauthorized => body.redirect("/login"),
            AppError::Forbidden => body.redirect("/admin/login"),
            _ => body,
        };

        (status, Json(body)).into_response()
    }
}
