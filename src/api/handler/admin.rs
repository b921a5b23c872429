use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::doctors::DoctorListing;
use crate::api::extract::AdminUser;
use crate::error::AppError;
use crate::models::api::{CreateDoctorRequest, StatusResponse};
use crate::models::doctors::DoctorCard;
use crate::models::AppState;
use crate::services::dashboard_service::{dashboard_stats, DashboardStats};
use crate::services::doctor_service::{
    create_doctor, list_active_doctors, list_all_doctors, toggle_doctor_status,
};
use crate::services::queue_service::{self, load_queue_page, QueuePage, QueueView};

#[derive(Debug, Serialize)]
pub struct DoctorStatus {
    pub id: Uuid,
    pub is_active: bool,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> Json<DashboardStats> {
    Json(dashboard_stats(&state.supabase, &admin.access_token).await)
}

pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> Json<Vec<DoctorCard>> {
    let doctors = list_all_doctors(&state.supabase, &admin.access_token)
        .await
        .unwrap_or_else(|e| {
            log::error!("error fetching doctors: {}", e);
            Vec::new()
        });
    Json(doctors.iter().map(DoctorCard::from).collect())
}

pub async fn add_doctor(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<StatusResponse>), AppError> {
    create_doctor(&state.supabase, &admin.access_token, &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(StatusResponse::success().redirect("/admin/doctors")),
    ))
}

pub async fn toggle_doctor(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<DoctorStatus>, AppError> {
    let is_active = toggle_doctor_status(&state.supabase, &admin.access_token, doctor_id).await?;
    Ok(Json(DoctorStatus {
        id: doctor_id,
        is_active,
    }))
}

/// Doctors whose queues can be managed today; inactive doctors have none.
pub async fn queues(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Json<DoctorListing> {
    let doctors = list_active_doctors(&state.supabase)
        .await
        .unwrap_or_else(|e| {
            log::error!("error fetching doctors: {}", e);
            Vec::new()
        });
    Json(DoctorListing::new(&doctors))
}

pub async fn queue_page(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(doctor_id): Path<Uuid>,
) -> Json<QueuePage> {
    Json(
        load_queue_page(
            &state.supabase,
            doctor_id,
            &admin.access_token,
            state.config.minutes_per_patient,
        )
        .await,
    )
}

pub async fn call_next(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<QueueView>, AppError> {
    let view = queue_service::advance_queue(
        &state.supabase,
        doctor_id,
        &admin.access_token,
        state.config.minutes_per_patient,
    )
    .await?;
    Ok(Json(view))
}

pub async fn complete_visit(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<QueueView>, AppError> {
    let view = queue_service::complete_visit(
        &state.supabase,
        doctor_id,
        &admin.access_token,
        state.config.minutes_per_patient,
    )
    .await?;
    Ok(Json(view))
}
