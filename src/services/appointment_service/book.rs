use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, SupabaseError};
use crate::models::appointments::{BookAppointmentParams, CreateAppointmentRequest};
use crate::models::database::{AuthUser, UserProfile};
use crate::models::doctors::DoctorCard;
use crate::services::doctor_service::get_doctor;
use crate::supabase::SupabaseClient;
use crate::utils::{long_date_label, today};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatientDetails {
    pub name: String,
    pub phone: String,
}

/// The confirm-appointment screen.
#[derive(Debug, Clone, Serialize)]
pub struct BookingForm {
    pub doctor: DoctorCard,
    pub date_label: String,
    pub patient: PatientDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub status: &'static str,
    pub token_number: Option<i64>,
    pub redirect: &'static str,
}

/// Profile values win over auth metadata; empty strings count as missing.
pub fn merge_patient_details(profile: Option<&UserProfile>, user: &AuthUser) -> PatientDetails {
    let pick = |from_profile: Option<&String>, from_metadata: &Option<String>| {
        from_profile
            .filter(|v| !v.is_empty())
            .or(from_metadata.as_ref().filter(|v| !v.is_empty()))
            .cloned()
            .unwrap_or_default()
    };
    PatientDetails {
        name: pick(profile.and_then(|p| p.name.as_ref()), &user.user_metadata.name),
        phone: pick(profile.and_then(|p| p.phone.as_ref()), &user.user_metadata.phone),
    }
}

pub async fn prefill_patient_details(
    client: &SupabaseClient,
    user: &AuthUser,
    access_token: &str,
) -> PatientDetails {
    let profile = client
        .from("public_users")
        .select("name, phone")
        .eq("id", user.id)
        .token(Some(access_token))
        .fetch_single::<UserProfile>()
        .await;
    match profile {
        Ok(profile) => merge_patient_details(Some(&profile), user),
        Err(e) => {
            if !e.is_not_found() {
                log::warn!("profile lookup for {} failed: {}", user.id, e);
            }
            merge_patient_details(None, user)
        }
    }
}

/// Builds the booking screen; the patient fields stay blank for anonymous visitors.
pub async fn booking_form(
    client: &SupabaseClient,
    doctor_id: Uuid,
    session: Option<(&AuthUser, &str)>,
) -> Result<BookingForm, AppError> {
    let doctor = get_doctor(client, doctor_id, session.map(|(_, token)| token))
        .await?
        .ok_or(AppError::NotFound("doctor"))?;

    let patient = match session {
        Some((user, token)) => prefill_patient_details(client, user, token).await,
        None => PatientDetails::default(),
    };

    Ok(BookingForm {
        doctor: DoctorCard::from(&doctor),
        date_label: long_date_label(today()),
        patient,
    })
}

/// Books a token through the remote procedure, which owns numbering and atomicity.
pub async fn book_appointment(
    client: &SupabaseClient,
    access_token: &str,
    doctor_id: Uuid,
    request: &CreateAppointmentRequest,
) -> Result<BookingConfirmation, SupabaseError> {
    let params = BookAppointmentParams {
        doctor_id_param: doctor_id,
        patient_name_param: request.patient_name.trim().to_string(),
        patient_phone_param: request.patient_phone.trim().to_string(),
    };
    let result = client
        .rpc("book_appointment", &params, Some(access_token))
        .await?;
    let token_number = result
        .get("token_number")
        .and_then(|v| v.as_i64())
        .or_else(|| result.as_i64());
    log::info!("booked doctor {} token {:?}", doctor_id, token_number);

    Ok(BookingConfirmation {
        status: "success",
        token_number,
        redirect: "/book/success",
    })
}
