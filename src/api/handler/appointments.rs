use std::sync::Arc;

use axum::{extract::State, Json};

use crate::api::extract::CurrentUser;
use crate::models::appointments::AppointmentResponse;
use crate::models::AppState;
use crate::services::appointment_service::my_appointments;

pub async fn list_my_appointments(
    State(state): State<Arc<AppState>>,
    session: CurrentUser,
) -> Json<Vec<AppointmentResponse>> {
    let appointments = my_appointments(&state.supabase, session.user.id, &session.access_token)
        .await
        .unwrap_or_else(|e| {
            log::error!("error fetching appointments for {}: {}", session.user.id, e);
            Vec::new()
        });
    Json(appointments.iter().map(AppointmentResponse::from).collect())
}
