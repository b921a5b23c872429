use std::net::SocketAddr;
use std::ops::RangeInclusive;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3043";
pub const DEFAULT_MINUTES_PER_PATIENT: i64 = 15;
pub const MINUTES_PER_PATIENT_RANGE: RangeInclusive<i64> = 1..=240;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Connection details for the hosted backend (REST, auth and realtime share one project URL).
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase: SupabaseConfig,
    pub bind_addr: SocketAddr,
    pub minutes_per_patient: i64,
    pub cors_allow_any: bool,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("SUPABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key = lookup("SUPABASE_ANON_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "SUPABASE_URL",
                value: url,
            });
        }

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let minutes_per_patient = match lookup("MINUTES_PER_PATIENT") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|m| MINUTES_PER_PATIENT_RANGE.contains(m))
                .ok_or(ConfigError::Invalid {
                    key: "MINUTES_PER_PATIENT",
                    value: raw,
                })?,
            None => DEFAULT_MINUTES_PER_PATIENT,
        };

        let cors_allow_any = match lookup("CORS_ALLOW_ANY") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                key: "CORS_ALLOW_ANY",
                value: raw,
            })?,
            None => true,
        };

        Ok(Config {
            supabase: SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            },
            bind_addr,
            minutes_per_patient,
            cors_allow_any,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
