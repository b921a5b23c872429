use serde::Serialize;

use crate::error::SupabaseError;
use crate::supabase::SupabaseClient;
use crate::utils::{long_date_label, today};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub doctors: u64,
    pub active_queues: u64,
    pub total_appointments: u64,
    pub date_label: String,
}

fn or_zero(what: &str, count: Result<u64, SupabaseError>) -> u64 {
    count.unwrap_or_else(|e| {
        log::error!("failed to count {}: {}", what, e);
        0
    })
}

/// Three head-only counts run concurrently; a failed count shows as zero.
pub async fn dashboard_stats(client: &SupabaseClient, access_token: &str) -> DashboardStats {
    let date = today();
    let token = Some(access_token);
    let (doctors, active, appointments) = tokio::join!(
        client.from("doctors").token(token).count(),
        client.from("doctors").eq("is_active", true).token(token).count(),
        client
            .from("appointments")
            .eq("appointment_date", date)
            .token(token)
            .count(),
    );

    DashboardStats {
        doctors: or_zero("doctors", doctors),
        active_queues: or_zero("active doctors", active),
        total_appointments: or_zero("appointments", appointments),
        date_label: long_date_label(date),
    }
}
