use serde::Serialize;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueEntry {
    pub appointment_id: Uuid,
    pub token_number: i64,
    pub status: AppointmentStatus,
    pub patient_name: Option<String>,
    /// Approximate wait, only set for waiting entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_minutes: Option<i64>,
}

impl QueueEntry {
    fn from_appointment(appointment: &Appointment) -> Self {
        QueueEntry {
            appointment_id: appointment.id,
            token_number: appointment.token_number,
            status: appointment.status,
            patient_name: appointment.patient_name.clone(),
            wait_minutes: None,
        }
    }
}

/// Projection of one doctor's appointments for the day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueueView {
    pub current: Option<QueueEntry>,
    pub waiting: Vec<QueueEntry>,
    pub next: Option<QueueEntry>,
    pub completed_count: usize,
    pub total: usize,
    pub can_advance: bool,
}

impl QueueView {
    /// Rebuilds the view from a fetched appointment list. Cancelled entries are
    /// ignored; input order does not matter.
    pub fn derive(appointments: &[Appointment], minutes_per_patient: i64) -> Self {
        let mut live: Vec<&Appointment> = appointments
            .iter()
            .filter(|a| a.status != AppointmentStatus::Cancelled)
            .collect();
        live.sort_by_key(|a| a.token_number);

        let in_progress: Vec<&&Appointment> = live
            .iter()
            .filter(|a| a.status == AppointmentStatus::InProgress)
            .collect();
        if in_progress.len() > 1 {
            log::warn!(
                "{} appointments in progress at once; showing token {}",
                in_progress.len(),
                in_progress[0].token_number
            );
        }
        let current = in_progress.first().map(|a| QueueEntry::from_appointment(a));
        let current_token = current.as_ref().map(|c| c.token_number).unwrap_or(0);

        let waiting: Vec<QueueEntry> = live
            .iter()
            .filter(|a| a.status == AppointmentStatus::Waiting)
            .map(|a| QueueEntry {
                wait_minutes: Some(
                    a.token_number
                        .saturating_sub(current_token)
                        .saturating_mul(minutes_per_patient)
                        .max(0),
                ),
                ..QueueEntry::from_appointment(a)
            })
            .collect();

        let next = waiting.first().cloned();
        let completed_count = live
            .iter()
            .filter(|a| a.status == AppointmentStatus::Completed)
            .count();

        QueueView {
            can_advance: current.is_none() && next.is_some(),
            current,
            waiting,
            next,
            completed_count,
            total: live.len(),
        }
    }

    #[cfg(test)]
    pub fn waiting_tokens(&self) -> Vec<i64> {
        self.waiting.iter().map(|w| w.token_number).collect()
    }
}
