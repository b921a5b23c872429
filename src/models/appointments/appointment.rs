use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::doctors::Doctor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Waiting,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Waiting => "WAITING",
            AppointmentStatus::InProgress => "IN_PROGRESS",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Display form, e.g. `IN PROGRESS`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub user_id: Uuid,
    pub token_number: i64,
    pub status: AppointmentStatus,
    pub appointment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_phone: Option<String>,
    // Present only when selected with `doctors(*)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctors: Option<Doctor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusPatch {
    pub status: AppointmentStatus,
}

/// Arguments of the remote `book_appointment` procedure.
#[derive(Debug, Clone, Serialize)]
pub struct BookAppointmentParams {
    pub doctor_id_param: Uuid,
    pub patient_name_param: String,
    pub patient_phone_param: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub patient_phone: String,
}

/// One row of the "My Appointments" page.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub token_number: i64,
    pub status: AppointmentStatus,
    pub status_label: String,
    pub appointment_date: NaiveDate,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
    pub specialization: Option<String>,
    pub is_live: bool,
}

impl From<&Appointment> for AppointmentResponse {
    fn from(appointment: &Appointment) -> Self {
        AppointmentResponse {
            id: appointment.id,
            token_number: appointment.token_number,
            status: appointment.status,
            status_label: appointment.status.label(),
            appointment_date: appointment.appointment_date,
            patient_name: appointment.patient_name.clone(),
            doctor_name: appointment.doctors.as_ref().map(|d| d.name.clone()),
            specialization: appointment.doctors.as_ref().map(|d| d.specialization.clone()),
            is_live: matches!(
                appointment.status,
                AppointmentStatus::Waiting | AppointmentStatus::InProgress
            ),
        }
    }
}
