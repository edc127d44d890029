//! Turns raw form state into the profile-creation request body.
//!
//! [`build`] is pure: it never touches the input and gives the same answer for
//! the same fields. Validation stops at the first violation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::FieldSet;
use crate::{DEFAULT_SECURITY_LEVEL, NATIONAL_ID, NATIONAL_ID_CODE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("User ID is mandatory")]
    MissingUserId,

    #[error("Invalid email format")]
    InvalidEmail,
}

/// Body of `POST /api/profiles/create`.
///
/// Optional keys are omitted from the JSON when absent; they are never sent as
/// `null` or as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub security_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl SubmissionRequest {
    /// Number of optional keys that will be sent.
    #[must_use]
    pub fn optional_field_count(&self) -> usize {
        [
            &self.name,
            &self.email,
            &self.phone_number,
            &self.document_number,
            &self.document_type,
            &self.country,
            &self.ip_address,
            &self.gender,
            &self.language,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

/// Validates `fields` and shapes them into the request body.
///
/// Empty optional fields are dropped, `securityLevel` falls back to `mid`, and
/// the legacy document type code is translated.
pub fn build(fields: &FieldSet) -> Result<SubmissionRequest, ValidationError> {
    validate(fields)?;

    let security_level = if fields.security_level.is_empty() {
        DEFAULT_SECURITY_LEVEL.to_string()
    } else {
        fields.security_level.clone()
    };

    Ok(SubmissionRequest {
        user_id: fields.user_id.clone(),
        security_level,
        name: present(&fields.name),
        email: present(&fields.email),
        phone_number: present(&fields.phone_number),
        document_number: present(&fields.document_number),
        document_type: present(&fields.document_type).map(translate_document_type),
        country: present(&fields.country),
        ip_address: present(&fields.ip_address),
        gender: present(&fields.gender),
        language: present(&fields.language),
    })
}

/// Checks `userID` first, then the email shape. The first violation wins.
pub fn validate(fields: &FieldSet) -> Result<(), ValidationError> {
    if fields.user_id.trim().is_empty() {
        return Err(ValidationError::MissingUserId);
    }

    if !fields.email.is_empty() && !is_email_shaped(&fields.email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// `local@domain.tld` with no whitespace and a single `@`.
#[must_use]
pub fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// The legacy numeric code `01` is the national ID; everything else is sent as is.
#[must_use]
pub fn translate_document_type(raw: String) -> String {
    if raw == NATIONAL_ID_CODE {
        NATIONAL_ID.to_string()
    } else {
        raw
    }
}

fn present(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
