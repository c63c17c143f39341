//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `RAIA_API_URL` - Backend base URL (default: `http://localhost:3000`)
//! - `RAIA_TOAST_DURATION_MS` - Toast auto-dismiss delay in milliseconds
//!   (default: 4000)

use std::time::Duration;

use thiserror::Error;

use crate::toast::DEFAULT_TOAST_DURATION;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

const API_URL_VAR: &str = "RAIA_API_URL";
const TOAST_DURATION_VAR: &str = "RAIA_TOAST_DURATION_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub toast_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            toast_duration: DEFAULT_TOAST_DURATION,
        }
    }
}

impl Config {
    /// Load configuration from the process environment, reading a `.env`
    /// file first if one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the toast duration is not a
    /// whole number of milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let toast_duration = match lookup(TOAST_DURATION_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError::InvalidEnvVar(TOAST_DURATION_VAR.to_string(), e.to_string()))?,
            None => DEFAULT_TOAST_DURATION,
        };

        Ok(Self {
            api_url,
            toast_duration,
        })
    }
}
