//! Profile API configuration.
//!
//! The shell builds an [`ApiConfig`] at startup (usually through
//! [`ApiConfig::from_env`]) and hands it to the core with
//! [`Event::Configure`](crate::Event::Configure). Missing or malformed values
//! fail here, before any submission is attempted.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{HttpError, ValidatedUrl};
use crate::CREATE_PROFILE_PATH;

pub const API_URL_ENV: &str = "BACKEND_API_URL";
pub const API_KEY_ENV: &str = "BACKEND_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("API base URL is not configured")]
    MissingBaseUrl,

    #[error("API key is not configured")]
    MissingApiKey,

    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug)]
pub struct ApiConfig {
    base_url: ValidatedUrl,
    api_key: SecretString,
}

impl ApiConfig {
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self, ConfigError> {
        if base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let base_url = ValidatedUrl::new(base_url.trim()).map_err(|e| match e {
            HttpError::InvalidUrl { reason, .. } => ConfigError::InvalidBaseUrl(reason),
            other => ConfigError::InvalidBaseUrl(other.to_string()),
        })?;

        Ok(Self { base_url, api_key })
    }

    /// Reads `BACKEND_API_URL` and `BACKEND_API_KEY` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_ENV).ok_or(ConfigError::MissingBaseUrl)?;
        let api_key = lookup(API_KEY_ENV).ok_or(ConfigError::MissingApiKey)?;
        Self::new(&base_url, SecretString::new(api_key))
    }

    #[must_use]
    pub fn base_url(&self) -> &ValidatedUrl {
        &self.base_url
    }

    #[must_use]
    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn profile_endpoint(&self) -> Result<ValidatedUrl, HttpError> {
        self.base_url.join_path(CREATE_PROFILE_PATH)
    }
}
