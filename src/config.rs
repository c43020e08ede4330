//! Process configuration read from environment variables.
//!
//! `main` loads `.env` (if present) before anything here runs. Each
//! subsystem with tunables owns a small typed config; this module holds the
//! top-level server settings and the booking backend selection.

use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SITE_DIR: &str = "site";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required env var {0} not set")]
    MissingVar(&'static str),
    #[error("unknown BOOKING_BACKEND: {0} (expected 'rest' or 'postgres')")]
    UnknownBookingBackend(String),
    #[error("invalid {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

// =============================================================================
// BOOKING BACKEND
// =============================================================================

/// Where booking rows are written.
#[derive(Clone, PartialEq, Eq)]
pub enum BookingBackend {
    /// Hosted table behind a PostgREST endpoint.
    Rest { base_url: String, api_key: String },
    /// Direct Postgres connection.
    Postgres { database_url: String },
}

impl fmt::Debug for BookingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rest { base_url, .. } => f
                .debug_struct("Rest")
                .field("base_url", base_url)
                .finish_non_exhaustive(),
            Self::Postgres { .. } => f.debug_struct("Postgres").finish_non_exhaustive(),
        }
    }
}

impl BookingBackend {
    /// - `BOOKING_BACKEND`: `rest` (default) or `postgres`
    /// - `rest`: `BOOKING_REST_URL`, `BOOKING_REST_KEY`
    /// - `postgres`: `DATABASE_URL`
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown backend or a missing variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = std::env::var("BOOKING_BACKEND").unwrap_or_else(|_| "rest".into());
        match backend.as_str() {
            "rest" => Ok(Self::Rest {
                base_url: required("BOOKING_REST_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                api_key: required("BOOKING_REST_KEY")?,
            }),
            "postgres" => Ok(Self::Postgres { database_url: required("DATABASE_URL")? }),
            other => Err(ConfigError::UnknownBookingBackend(other.to_string())),
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Directory holding the static page shell.
    pub site_dir: PathBuf,
    pub booking: BookingBackend,
}

impl AppConfig {
    /// Optional: `PORT` (default 3000), `SITE_DIR` (default `site`).
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a port number or the booking backend
    /// is misconfigured.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };
        let site_dir = std::env::var("SITE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SITE_DIR));
        Ok(Self { port, site_dir, booking: BookingBackend::from_env()? })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
