use serde::{Deserialize, Serialize};
use std::fmt;

use crate::capabilities::TimerId;
use crate::config::{ApiConfig, ConfigError};
use crate::DEFAULT_SECURITY_LEVEL;

/// One input of the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    #[serde(rename = "userID")]
    UserId,
    Email,
    PhoneNumber,
    Country,
    IpAddress,
    DocumentNumber,
    DocumentType,
    SecurityLevel,
    Gender,
    Language,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Name,
        Field::UserId,
        Field::Email,
        Field::PhoneNumber,
        Field::Country,
        Field::IpAddress,
        Field::DocumentNumber,
        Field::DocumentType,
        Field::SecurityLevel,
        Field::Gender,
        Field::Language,
    ];

    /// Key used both in the form and in the API payload.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::UserId => "userID",
            Self::Email => "email",
            Self::PhoneNumber => "phoneNumber",
            Self::Country => "country",
            Self::IpAddress => "ipAddress",
            Self::DocumentNumber => "documentNumber",
            Self::DocumentType => "documentType",
            Self::SecurityLevel => "securityLevel",
            Self::Gender => "gender",
            Self::Language => "language",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw form state. An empty string means the user left the field blank.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldSet {
    pub name: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub email: String,
    pub phone_number: String,
    pub country: String,
    pub ip_address: String,
    pub document_number: String,
    pub document_type: String,
    pub security_level: String,
    pub gender: String,
    pub language: String,
}

impl Default for FieldSet {
    fn default() -> Self {
        Self {
            name: String::new(),
            user_id: String::new(),
            email: String::new(),
            phone_number: String::new(),
            country: String::new(),
            ip_address: String::new(),
            document_number: String::new(),
            document_type: String::new(),
            security_level: DEFAULT_SECURITY_LEVEL.to_string(),
            gender: String::new(),
            language: String::new(),
        }
    }
}

impl FieldSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::UserId => &self.user_id,
            Field::Email => &self.email,
            Field::PhoneNumber => &self.phone_number,
            Field::Country => &self.country,
            Field::IpAddress => &self.ip_address,
            Field::DocumentNumber => &self.document_number,
            Field::DocumentType => &self.document_type,
            Field::SecurityLevel => &self.security_level,
            Field::Gender => &self.gender,
            Field::Language => &self.language,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::UserId => &mut self.user_id,
            Field::Email => &mut self.email,
            Field::PhoneNumber => &mut self.phone_number,
            Field::Country => &mut self.country,
            Field::IpAddress => &mut self.ip_address,
            Field::DocumentNumber => &mut self.document_number,
            Field::DocumentType => &mut self.document_type,
            Field::SecurityLevel => &mut self.security_level,
            Field::Gender => &mut self.gender,
            Field::Language => &mut self.language,
        };
        *slot = value.into();
    }

    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn filled(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL
            .into_iter()
            .filter(|f| !self.get(*f).is_empty())
    }

    /// Document numbers only make sense once a document type is chosen.
    #[must_use]
    pub fn document_number_enabled(&self) -> bool {
        !self.document_type.is_empty()
    }
}

// Redact debug output because every field is user-provided personal data.
impl fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled: Vec<&str> = self.filled().map(Field::key).collect();
        f.debug_struct("FieldSet")
            .field("filled", &filled)
            .field("security_level", &self.security_level)
            .finish()
    }
}

/// Where the current submission attempt stands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmissionPhase {
    /// Ready for input; also where rejected and failed attempts land.
    #[default]
    Idle,
    /// The create request is with the shell.
    Submitting { request_id: String },
    /// Profile created; waiting for the redirect timer.
    Redirecting,
    /// Navigation requested. The session is over.
    Redirected,
    /// The view was torn down.
    Closed,
}

impl SubmissionPhase {
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    #[must_use]
    pub const fn accepts_submit(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Redirected | Self::Closed)
    }
}

/// A scheduled navigation, kept so it can be cancelled on teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRedirect {
    pub timer_id: TimerId,
    pub url: String,
    pub profile_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastMessage {
    pub message: String,
    pub kind: ToastKind,
}

impl ToastMessage {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Loading,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    /// `None` keeps the toast up until the core replaces it.
    #[must_use]
    pub const fn default_duration_ms(self) -> Option<u64> {
        match self {
            Self::Loading => None,
            Self::Success => Some(2000),
            Self::Warning => Some(4000),
            Self::Error => Some(5000),
        }
    }
}

#[derive(Debug, Default)]
pub struct Model {
    pub fields: FieldSet,
    pub phase: SubmissionPhase,
    pub is_loading: bool,
    pub active_toast: Option<ToastMessage>,
    pub pending_redirect: Option<PendingRedirect>,
    pub config: Option<ApiConfig>,
    pub config_error: Option<ConfigError>,
}

impl Model {
    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.active_toast = Some(ToastMessage::new(message, kind));
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.phase.accepts_submit() && !self.is_loading && self.config.is_some()
    }
}
