use uuid::Uuid;

use crate::error::SupabaseError;
use crate::models::appointments::{AppointmentStatus, StatusPatch};
use crate::supabase::SupabaseClient;

/// Writes a new status for one appointment. Transition rules are the backend's.
pub async fn set_status(
    client: &SupabaseClient,
    appointment_id: Uuid,
    status: AppointmentStatus,
    access_token: &str,
) -> Result<(), SupabaseError> {
    client
        .from("appointments")
        .eq("id", appointment_id)
        .token(Some(access_token))
        .update(&StatusPatch { status })
        .await
}
