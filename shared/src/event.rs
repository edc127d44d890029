use secrecy::SecretString;
use serde::Deserialize;

use crate::capabilities::{HttpResult, TimerId, TimerOutput};
use crate::model::Field;

/// Everything that can happen to the intake form.
///
/// Shell-originated events come first; the rest are capability responses and
/// are only constructed by the core's own callbacks. Only `Deserialize` is
/// derived: events flow from the shell into the core, never back, and the API
/// key must not be serializable.
#[derive(Debug, Deserialize)]
pub enum Event {
    // Shell
    Configure {
        base_url: String,
        api_key: SecretString,
    },
    FieldChanged {
        field: Field,
        value: String,
    },
    SubmitRequested,
    DismissToast,
    SessionClosed,

    // Capability responses (boxed to keep the enum small)
    ProfileCreated(Box<HttpResult>),
    RedirectTimerFired {
        id: TimerId,
        output: TimerOutput,
    },
}

impl Event {
    /// Variant name for logs. Never includes payload values.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configure { .. } => "configure",
            Self::FieldChanged { .. } => "field_changed",
            Self::SubmitRequested => "submit_requested",
            Self::DismissToast => "dismiss_toast",
            Self::SessionClosed => "session_closed",
            Self::ProfileCreated(_) => "profile_created",
            Self::RedirectTimerFired { .. } => "redirect_timer_fired",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::ProfileCreated(_) | Self::RedirectTimerFired { .. }
        )
    }
}
