//! Runtime configuration
//!
//! Everything is read from the environment (a `.env` file is loaded first)
//! with development defaults, so a bare run serves the in-memory store on
//! localhost without any setup.

use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Postgres connection string. Absent means the in-memory store.
    pub database_url: Option<String>,
    /// NATS server URL. Absent disables the event mirror.
    pub nats_url: Option<String>,
    pub nats_subject_prefix: String,
    /// Directory uploads are written to and `/media` is served from.
    pub storage_root: String,
    /// Base used when composing public URLs for stored objects.
    pub public_base_url: String,
    pub admin_email: String,
    pub admin_password: Option<String>,
    /// PHC-format hash; takes precedence over `admin_password` when both are
    /// set.
    pub admin_password_hash: Option<String>,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8083);
        Self {
            port,
            database_url: env::var("DATABASE_URL").ok(),
            nats_url: env::var("NATS_URL").ok(),
            nats_subject_prefix: env::var("NATS_SUBJECT_PREFIX")
                .unwrap_or_else(|_| "atelier".to_string()),
            storage_root: env::var("STORAGE_ROOT").unwrap_or_else(|_| "media".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@atelier.local".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").ok(),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
        }
    }
}
