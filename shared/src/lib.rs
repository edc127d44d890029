#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Headless core of the KYC intake form.
//!
//! The shell feeds field edits and the submit action in as [`Event`]s, renders
//! the [`ViewModel`], and executes the effects the core requests: the
//! profile-creation HTTP call, the redirect timer, and the final navigation.

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod event;
pub mod model;
pub mod payload;
pub mod submission;
pub mod view;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::{ApiConfig, ConfigError};
pub use event::Event;
pub use model::{Field, FieldSet, Model, SubmissionPhase, ToastKind, ToastMessage};
pub use payload::{SubmissionRequest, ValidationError};
pub use submission::{SubmissionError, SubmissionOutcome};
pub use view::ViewModel;

pub const CREATE_PROFILE_PATH: &str = "/api/profiles/create";
pub const API_KEY_HEADER: &str = "x-api-key";
pub const CREATE_PROFILE_TIMEOUT: Duration = Duration::from_secs(30);
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_SECURITY_LEVEL: &str = "mid";
pub const NATIONAL_ID_CODE: &str = "01";
pub const NATIONAL_ID: &str = "national_id";

/// Coarse classification of everything that can stop a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Configuration,
    Transport,
    Semantic,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::Transport => "TRANSPORT_ERROR",
            Self::Semantic => "SEMANTIC_ERROR",
        }
    }

    /// Toast severity used when an error of this kind reaches the user.
    #[must_use]
    pub const fn toast_kind(self) -> ToastKind {
        match self {
            Self::Validation => ToastKind::Warning,
            Self::Configuration | Self::Transport | Self::Semantic => ToastKind::Error,
        }
    }
}
