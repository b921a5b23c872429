// src/api/mod.rs

pub mod extract;
pub mod handler;
pub mod ws;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::models::api::StatusResponse;
use crate::models::AppState;
use handler::{admin, appointments, auth, doctors};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/doctors", get(doctors::list_doctors))
        .route("/doctors/{id}", get(doctors::booking_page))
        .route("/doctors/{id}/book", post(doctors::book))
        .route("/my-appointments", get(appointments::list_my_appointments))
        .route("/my-appointments/ws", get(ws::my_appointments_socket))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        .route("/admin/login", post(auth::login))
        .route("/admin/dashboard", get(admin::dashboard))
        .route(
            "/admin/doctors",
            get(admin::list_doctors).post(admin::add_doctor),
        )
        .route("/admin/doctors/{id}/toggle", post(admin::toggle_doctor))
        .route("/admin/queues", get(admin::queues))
        .route("/admin/doctors/{id}/queue", get(admin::queue_page))
        .route("/admin/doctors/{id}/queue/next", post(admin::call_next))
        .route(
            "/admin/doctors/{id}/queue/complete",
            post(admin::complete_visit),
        )
        .route("/admin/doctors/{id}/queue/ws", get(ws::queue_socket))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(StatusResponse::error("page not found").redirect("/")),
    )
}
