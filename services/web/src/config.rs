//! services/web/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub log_level: Level,
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub qa_model: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server, Database and Storage Settings ---
        let bind_address = parse_var("BIND_ADDRESS", "127.0.0.1:5000")?;

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://study.db".to_string());

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load the Answer Generator Settings ---
        let gemini_api_key = require_var("GEMINI_API_KEY")?;
        let gemini_api_base = std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| {
            "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
        });
        let qa_model =
            std::env::var("QA_MODEL").unwrap_or_else(|_| "gemini-2.0-flash-exp".to_string());

        // --- Load Session and Request Limits ---
        let session_ttl_hours = parse_var("SESSION_TTL_HOURS", "720")?;
        let cookie_secure = parse_var("COOKIE_SECURE", "false")?;
        let max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", "16777216")?;

        Ok(Self {
            bind_address,
            database_url,
            upload_dir,
            log_level,
            gemini_api_key,
            gemini_api_base,
            qa_model,
            session_ttl_hours,
            cookie_secure,
            max_upload_bytes,
        })
    }
}

/// Reads a variable that has no default; unset or empty is an error.
fn require_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

/// Reads `name` from the environment (or `default`) and parses it.
fn parse_var<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_to_default() {
        let ttl: i64 = parse_var("STUDY_HUB_TEST_UNSET_TTL", "12").unwrap();
        assert_eq!(ttl, 12);
    }

    #[test]
    fn unset_required_variable_is_missing() {
        match require_var("STUDY_HUB_TEST_UNSET_KEY") {
            Err(ConfigError::MissingVar(name)) => assert_eq!(name, "STUDY_HUB_TEST_UNSET_KEY"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn parse_var_reports_the_variable_name() {
        let err = parse_var::<bool>("STUDY_HUB_TEST_UNSET_FLAG", "maybe").unwrap_err();
        match err {
            ConfigError::InvalidValue(name, _) => assert_eq!(name, "STUDY_HUB_TEST_UNSET_FLAG"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
