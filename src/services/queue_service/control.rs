use thiserror::Error;
use uuid::Uuid;

use super::view::QueueView;
use crate::error::{AppError, SupabaseError};
use crate::models::{Appointment, AppointmentStatus};
use crate::services::appointment_service::set_status;
use crate::supabase::SupabaseClient;
use crate::utils::today;

#[derive(Debug, Error, PartialEq)]
pub enum QueueError {
    #[error("token {0} is still in progress")]
    PatientInProgress(i64),
    #[error("no patients waiting")]
    QueueEmpty,
    #[error("no patient in progress")]
    NoPatientInProgress,
}

/// Today's non-cancelled appointments for a doctor, by token.
pub async fn fetch_today_queue(
    client: &SupabaseClient,
    doctor_id: Uuid,
    access_token: &str,
) -> Result<Vec<Appointment>, SupabaseError> {
    client
        .from("appointments")
        .eq("doctor_id", doctor_id)
        .eq("appointment_date", today())
        .neq("status", AppointmentStatus::Cancelled)
        .order("token_number", true)
        .token(Some(access_token))
        .fetch()
        .await
}

pub async fn load_queue_view(
    client: &SupabaseClient,
    doctor_id: Uuid,
    access_token: &str,
    minutes_per_patient: i64,
) -> Result<QueueView, SupabaseError> {
    let appointments = fetch_today_queue(client, doctor_id, access_token).await?;
    Ok(QueueView::derive(&appointments, minutes_per_patient))
}

/// Calls the next waiting patient. The returned view is re-fetched after the update.
pub async fn advance_queue(
    client: &SupabaseClient,
    doctor_id: Uuid,
    access_token: &str,
    minutes_per_patient: i64,
) -> Result<QueueView, AppError> {
    let view = load_queue_view(client, doctor_id, access_token, minutes_per_patient).await?;
    if let Some(current) = &view.current {
        return Err(QueueError::PatientInProgress(current.token_number).into());
    }
    let next = view.next.ok_or(QueueError::QueueEmpty)?;

    set_status(client, next.appointment_id, AppointmentStatus::InProgress, access_token).await?;
    log::info!("doctor {} called token {}", doctor_id, next.token_number);

    Ok(load_queue_view(client, doctor_id, access_token, minutes_per_patient).await?)
}

/// Marks the patient in progress as completed, then re-fetches.
pub async fn complete_visit(
    client: &SupabaseClient,
    doctor_id: Uuid,
    access_token: &str,
    minutes_per_patient: i64,
) -> Result<QueueView, AppError> {
    let view = load_queue_view(client, doctor_id, access_token, minutes_per_patient).await?;
    let current = view.current.ok_or(QueueError::NoPatientInProgress)?;

    set_status(client, current.appointment_id, AppointmentStatus::Completed, access_token).await?;
    log::info!("doctor {} completed token {}", doctor_id, current.token_number);

    Ok(load_queue_view(client, doctor_id, access_token, minutes_per_patient).await?)
}
