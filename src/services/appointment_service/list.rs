use uuid::Uuid;

use crate::error::SupabaseError;
use crate::models::Appointment;
use crate::supabase::SupabaseClient;

/// A user's appointments with their doctor joined, newest date first.
pub async fn my_appointments(
    client: &SupabaseClient,
    user_id: Uuid,
    access_token: &str,
) -> Result<Vec<Appointment>, SupabaseError> {
    client
        .from("appointments")
        .select("*, doctors(*)")
        .eq("user_id", user_id)
        .order("appointment_date", false)
        .order("created_at", false)
        .token(Some(access_token))
        .fetch()
        .await
}
