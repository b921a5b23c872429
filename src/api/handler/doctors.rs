use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::api::extract::{CurrentUser, MaybeUser};
use crate::error::AppError;
use crate::models::appointments::CreateAppointmentRequest;
use crate::models::doctors::{Doctor, DoctorCard};
use crate::models::AppState;
use crate::services::appointment_service::{book_appointment, booking_form, BookingConfirmation, BookingForm};
use crate::services::doctor_service::list_active_doctors;
use crate::utils::{long_date_label, today};

#[derive(Debug, Serialize)]
pub struct DoctorListing {
    pub date_label: String,
    pub doctors: Vec<DoctorCard>,
}

impl DoctorListing {
    pub fn new(doctors: &[Doctor]) -> Self {
        DoctorListing {
            date_label: long_date_label(today()),
            doctors: doctors.iter().map(DoctorCard::from).collect(),
        }
    }
}

/// Home page list. Fetch errors leave the list empty.
pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Json<DoctorListing> {
    let doctors = list_active_doctors(&state.supabase)
        .await
        .unwrap_or_else(|e| {
            log::error!("error fetching doctors: {}", e);
            Vec::new()
        });
    Json(DoctorListing::new(&doctors))
}

pub async fn booking_page(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    MaybeUser(session): MaybeUser,
) -> Result<Json<BookingForm>, AppError> {
    let session = session
        .as_ref()
        .map(|s| (&s.user, s.access_token.as_str()));
    let form = booking_form(&state.supabase, doctor_id, session).await?;
    Ok(Json(form))
}

pub async fn book(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    session: CurrentUser,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), AppError> {
    let confirmation =
        book_appointment(&state.supabase, &session.access_token, doctor_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}
