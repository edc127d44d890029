//! Building the profile-creation call and classifying what comes back.

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::capabilities::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResult};
use crate::config::ApiConfig;
use crate::payload::SubmissionRequest;
use crate::{ErrorKind, API_KEY_HEADER, CREATE_PROFILE_TIMEOUT};

pub const LOADING_MESSAGE: &str = "Creating KYC record...";
pub const SUCCESS_MESSAGE: &str = "KYC record created successfully! Redirecting...";
pub const NOT_CONFIGURED_MESSAGE: &str = "Profile service is not configured";

#[must_use]
pub fn error_message(reason: &str) -> String {
    format!("Error: {reason}")
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SubmissionError {
    #[error("{0}")]
    Transport(HttpError),

    #[error("HTTP error: status {status}")]
    HttpStatus { status: u16 },

    #[error("Invalid response from server: missing ID or URL")]
    MissingIdOrUrl,

    #[error("Invalid response from server: {message}")]
    UndecodableBody { message: String },

    #[error("Invalid response from server: unsafe redirect URL")]
    UnsafeRedirect,
}

impl SubmissionError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::HttpStatus { .. } => ErrorKind::Transport,
            Self::MissingIdOrUrl | Self::UndecodableBody { .. } | Self::UnsafeRedirect => {
                ErrorKind::Semantic
            }
        }
    }
}

/// `url` is the server's redirect target exactly as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success { id: String, url: String },
    Failure { reason: String, kind: ErrorKind },
}

impl SubmissionOutcome {
    #[must_use]
    pub fn from_http_result(result: HttpResult) -> Self {
        match classify(result) {
            Ok((id, url)) => Self::Success { id, url },
            Err(error) => Self::Failure {
                reason: error.to_string(),
                kind: error.kind(),
            },
        }
    }
}

/// Maps the shell's HTTP result to the created profile's id and redirect URL.
pub fn classify(result: HttpResult) -> Result<(String, String), SubmissionError> {
    let response = result.map_err(SubmissionError::Transport)?;

    if !response.is_success() {
        return Err(SubmissionError::HttpStatus {
            status: response.status(),
        });
    }

    created_profile(&response)
}

fn created_profile(response: &HttpResponse) -> Result<(String, String), SubmissionError> {
    let body: Value = response.json().map_err(|e| match e {
        HttpError::InvalidResponse { reason, .. } => {
            SubmissionError::UndecodableBody { message: reason }
        }
        other => SubmissionError::UndecodableBody {
            message: other.to_string(),
        },
    })?;

    let id = match body.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(SubmissionError::MissingIdOrUrl),
    };

    let url = match body.get("url") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => return Err(SubmissionError::MissingIdOrUrl),
    };

    if !is_navigable(&url) {
        return Err(SubmissionError::UnsafeRedirect);
    }

    Ok((id, url))
}

/// Relative targets and absolute `http`/`https` URLs. Other schemes such as
/// `javascript:` or `data:` are refused.
#[must_use]
pub fn is_navigable(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

/// `POST {base}/api/profiles/create` carrying the key header and JSON body.
pub fn create_profile_request(
    config: &ApiConfig,
    body: &SubmissionRequest,
) -> Result<HttpRequest, HttpError> {
    HttpRequest::new(HttpMethod::Post, config.profile_endpoint()?)
        .with_header(API_KEY_HEADER, config.api_key().expose_secret().as_str())?
        .with_json(body)?
        .with_timeout(CREATE_PROFILE_TIMEOUT)
}
