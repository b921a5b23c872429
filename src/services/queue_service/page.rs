use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::control::load_queue_view;
use super::view::QueueView;
use crate::models::doctors::DoctorCard;
use crate::services::doctor_service::get_doctor;
use crate::supabase::SupabaseClient;
use crate::utils::{short_date_label, today};

/// Everything the admin queue screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct QueuePage {
    pub doctor: Option<DoctorCard>,
    pub date: NaiveDate,
    pub date_label: String,
    pub queue: QueueView,
}

/// Doctor and queue are fetched together. A failed fetch is logged and leaves
/// its half of the page empty.
pub async fn load_queue_page(
    client: &SupabaseClient,
    doctor_id: Uuid,
    access_token: &str,
    minutes_per_patient: i64,
) -> QueuePage {
    let (doctor, queue) = tokio::join!(
        get_doctor(client, doctor_id, Some(access_token)),
        load_queue_view(client, doctor_id, access_token, minutes_per_patient)
    );

    let doctor = doctor.unwrap_or_else(|e| {
        log::error!("failed to load doctor {}: {}", doctor_id, e);
        None
    });
    let queue = queue.unwrap_or_else(|e| {
        log::error!("failed to load queue for {}: {}", doctor_id, e);
        QueueView::default()
    });

    let date = today();
    QueuePage {
        doctor: doctor.as_ref().map(DoctorCard::from),
        date,
        date_label: short_date_label(date),
        queue,
    }
}
