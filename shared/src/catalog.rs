//! Choices offered by the form's select inputs.
//!
//! Shells render these verbatim so every platform offers the same values. The
//! core does not restrict field edits to them.

use serde::{Deserialize, Serialize};

/// A static `(value, label)` pair.
pub type Choice = (&'static str, &'static str);

pub const COUNTRIES: &[Choice] = &[("MALAYSIA", "Malaysia"), ("THAILAND", "Thailand")];

pub const DOCUMENT_TYPES: &[Choice] = &[
    ("national_id", "NRIC"),
    ("passport", "Passport"),
    ("driving_license", "Driver License"),
    ("others", "Others"),
];

pub const SECURITY_LEVELS: &[Choice] = &[("low", "Low"), ("mid", "Mid"), ("high", "High")];

pub const GENDERS: &[Choice] = &[("male", "Male"), ("female", "Female")];

pub const LANGUAGES: &[Choice] = &[
    ("en", "English"),
    ("th", "Thai"),
    ("zh-CN", "Chinese (Simplified)"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    pub country: Vec<SelectOption>,
    pub document_type: Vec<SelectOption>,
    pub security_level: Vec<SelectOption>,
    pub gender: Vec<SelectOption>,
    pub language: Vec<SelectOption>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            country: to_options(COUNTRIES),
            document_type: to_options(DOCUMENT_TYPES),
            security_level: to_options(SECURITY_LEVELS),
            gender: to_options(GENDERS),
            language: to_options(LANGUAGES),
        }
    }
}

fn to_options(choices: &[Choice]) -> Vec<SelectOption> {
    choices
        .iter()
        .map(|(value, label)| SelectOption {
            value: (*value).to_string(),
            label: (*label).to_string(),
        })
        .collect()
}
