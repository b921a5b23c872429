use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::date_utils::format_clinic_hours;

/// Specializations offered when adding a doctor.
pub const SPECIALIZATIONS: [&str; 12] = [
    "General Physician",
    "Cardiologist",
    "Dermatologist",
    "Pediatrician",
    "Neurologist",
    "Orthopedic Surgeon",
    "Gynecologist",
    "ENT Specialist",
    "Dentist",
    "Ophthalmologist",
    "Psychiatrist",
    "Urologist",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    pub fn clinic_hours(&self) -> String {
        format_clinic_hours(self.start_time, self.end_time)
    }
}

// Row sent to the `doctors` insert; id, is_active and created_at come from column defaults.
#[derive(Debug, Clone, Serialize)]
pub struct NewDoctor {
    pub name: String,
    pub specialization: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorActivePatch {
    pub is_active: bool,
}

/// Doctor card as listed on the home page and the admin lists.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorCard {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub clinic_hours: String,
    pub is_active: bool,
    pub status_label: &'static str,
}

impl From<&Doctor> for DoctorCard {
    fn from(doctor: &Doctor) -> Self {
        DoctorCard {
            id: doctor.id,
            name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            clinic_hours: doctor.clinic_hours(),
            is_active: doctor.is_active,
            status_label: if doctor.is_active { "Active" } else { "Inactive" },
        }
    }
}
