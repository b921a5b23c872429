use uuid::Uuid;

use crate::error::{AppError, SupabaseError};
use crate::models::api::CreateDoctorRequest;
use crate::models::doctors::{Doctor, DoctorActivePatch, NewDoctor, SPECIALIZATIONS};
use crate::supabase::SupabaseClient;
use crate::utils::date_utils::parse_time_of_day;

/// Active doctors by name, as shown on the home page and the admin queue list.
pub async fn list_active_doctors(client: &SupabaseClient) -> Result<Vec<Doctor>, SupabaseError> {
    client
        .from("doctors")
        .eq("is_active", true)
        .order("name", true)
        .fetch()
        .await
}

pub async fn list_all_doctors(
    client: &SupabaseClient,
    access_token: &str,
) -> Result<Vec<Doctor>, SupabaseError> {
    client
        .from("doctors")
        .order("name", true)
        .token(Some(access_token))
        .fetch()
        .await
}

/// `Ok(None)` when no doctor has this id.
pub async fn get_doctor(
    client: &SupabaseClient,
    doctor_id: Uuid,
    access_token: Option<&str>,
) -> Result<Option<Doctor>, SupabaseError> {
    match client
        .from("doctors")
        .eq("id", doctor_id)
        .token(access_token)
        .fetch_single()
        .await
    {
        Ok(doctor) => Ok(Some(doctor)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn validate_new_doctor(request: &CreateDoctorRequest) -> Result<NewDoctor, AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    let specialization = request.specialization.trim();
    if !SPECIALIZATIONS.contains(&specialization) {
        return Err(AppError::BadRequest(format!(
            "unknown specialization: {}",
            request.specialization
        )));
    }
    let start_time = parse_time_of_day(&request.start_time)
        .ok_or_else(|| AppError::BadRequest("start_time must be HH:MM".to_string()))?;
    let end_time = parse_time_of_day(&request.end_time)
        .ok_or_else(|| AppError::BadRequest("end_time must be HH:MM".to_string()))?;

    Ok(NewDoctor {
        name: name.to_string(),
        specialization: specialization.to_string(),
        start_time,
        end_time,
    })
}

pub async fn create_doctor(
    client: &SupabaseClient,
    access_token: &str,
    request: &CreateDoctorRequest,
) -> Result<(), AppError> {
    let doctor = validate_new_doctor(request)?;
    log::info!("adding doctor {} ({})", doctor.name, doctor.specialization);
    client
        .from("doctors")
        .token(Some(access_token))
        .insert(&[doctor])
        .await?;
    Ok(())
}

/// Flips `is_active` based on the doctor's current stored value and returns the new value.
pub async fn toggle_doctor_status(
    client: &SupabaseClient,
    access_token: &str,
    doctor_id: Uuid,
) -> Result<bool, AppError> {
    let doctor = get_doctor(client, doctor_id, Some(access_token))
        .await?
        .ok_or(AppError::NotFound("doctor"))?;
    let is_active = !doctor.is_active;
    client
        .from("doctors")
        .eq("id", doctor_id)
        .token(Some(access_token))
        .update(&DoctorActivePatch { is_active })
        .await?;
    log::info!("doctor {} is_active -> {}", doctor_id, is_active);
    Ok(is_active)
}
