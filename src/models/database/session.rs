use serde::{Deserialize, Serialize};

use super::user::AuthUser;

/// Session issued by a password grant or a sign-up with auto-confirm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: AuthUser,
}
