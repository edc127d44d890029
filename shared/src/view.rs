use serde::{Deserialize, Serialize};

use crate::catalog::FieldOptions;
use crate::model::{FieldSet, SubmissionPhase, ToastKind, ToastMessage};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
    /// `None` while the toast should stay until replaced.
    pub duration_ms: Option<u64>,
}

impl From<&ToastMessage> for ToastView {
    fn from(t: &ToastMessage) -> Self {
        Self {
            message: t.message.clone(),
            kind: t.kind,
            duration_ms: t.kind.default_duration_ms(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormView {
    pub values: FieldSet,
    pub document_number_enabled: bool,
    pub options: FieldOptions,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub form: FormView,
    pub phase: SubmissionPhase,
    pub is_loading: bool,
    pub can_submit: bool,
    pub toast: Option<ToastView>,
    /// URL the shell is about to be sent to, if a redirect is scheduled.
    pub pending_redirect: Option<String>,
    pub config_error: Option<String>,
}
