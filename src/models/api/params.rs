use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Add-doctor form; times are `HH:MM` as entered.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialization: String,
    pub start_time: String,
    pub end_time: String,
}

// Browsers cannot set headers on a websocket upgrade, so the session token may ride in the query.
#[derive(Debug, Default, Deserialize)]
pub struct TokenParams {
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl StatusResponse {
    pub fn success() -> Self {
        StatusResponse {
            status: "success",
            message: None,
            redirect: None,
        }
    }

    pub fn redirect(mut self, to: &'static str) -> Self {
        self.redirect = Some(to);
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        StatusResponse {
            status: "error",
            message: Some(message.into()),
            redirect: None,
        }
    }
}
