use tracing::{debug, info, warn};

use crate::capabilities::{Capabilities, HttpResult, TimerId, TimerOutput};
use crate::catalog::FieldOptions;
use crate::config::ApiConfig;
use crate::event::Event;
use crate::model::{Field, Model, PendingRedirect, SubmissionPhase, ToastKind};
use crate::payload;
use crate::submission::{
    self, SubmissionOutcome, LOADING_MESSAGE, NOT_CONFIGURED_MESSAGE, SUCCESS_MESSAGE,
};
use crate::view::{FormView, ToastView, ViewModel};
use crate::{ErrorKind, REDIRECT_DELAY};

#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();

        if model.phase.is_terminal() {
            debug!(event = event_name, phase = ?model.phase, "session finished, event ignored");
            return;
        }

        debug!(event = event_name, user = event.is_user_initiated(), "handling event");

        match event {
            Event::Configure { base_url, api_key } => {
                match ApiConfig::new(&base_url, api_key) {
                    Ok(config) => {
                        info!(host = config.base_url().host(), "profile service configured");
                        model.config = Some(config);
                        model.config_error = None;
                    }
                    Err(e) => {
                        warn!(error = %e, "rejected profile service configuration");
                        model.config = None;
                        model.config_error = Some(e);
                    }
                }
                caps.render.render();
            }

            Event::FieldChanged { field, value } => {
                if field == Field::DocumentNumber && !model.fields.document_number_enabled() {
                    debug!("document number edit ignored without a document type");
                    return;
                }

                if field == Field::DocumentType && value.is_empty() {
                    model.fields.set(Field::DocumentNumber, String::new());
                }

                model.fields.set(field, value);
                caps.render.render();
            }

            Event::SubmitRequested => Self::submit(model, caps),

            Event::ProfileCreated(result) => Self::profile_created(*result, model, caps),

            Event::RedirectTimerFired { id, output } => {
                Self::redirect_timer_fired(&id, output, model, caps);
            }

            Event::DismissToast => {
                model.clear_toast();
                caps.render.render();
            }

            Event::SessionClosed => {
                if let Some(pending) = model.pending_redirect.take() {
                    info!(timer = %pending.timer_id, "cancelling pending redirect");
                    caps.timer.cancel(pending.timer_id);
                }
                model.is_loading = false;
                model.phase = SubmissionPhase::Closed;
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel {
            form: FormView {
                values: model.fields.clone(),
                document_number_enabled: model.fields.document_number_enabled(),
                options: FieldOptions::default(),
            },
            phase: model.phase.clone(),
            is_loading: model.is_loading,
            can_submit: model.can_submit(),
            toast: model.active_toast.as_ref().map(ToastView::from),
            pending_redirect: model.pending_redirect.as_ref().map(|p| p.url.clone()),
            config_error: model.config_error.as_ref().map(ToString::to_string),
        }
    }
}

impl App {
    fn submit(model: &mut Model, caps: &Capabilities) {
        if !model.phase.accepts_submit() {
            info!(phase = ?model.phase, "submission already under way, ignoring");
            return;
        }

        let body = match payload::build(&model.fields) {
            Ok(body) => body,
            Err(e) => {
                let kind = ErrorKind::Validation;
                debug!(code = kind.code(), error = ?e, "submission rejected by validation");
                model.show_toast(e.to_string(), kind.toast_kind());
                caps.render.render();
                return;
            }
        };

        let Some(config) = model.config.as_ref() else {
            let kind = ErrorKind::Configuration;
            warn!(
                code = kind.code(),
                "submission attempted without profile service configuration"
            );
            model.show_toast(NOT_CONFIGURED_MESSAGE, kind.toast_kind());
            caps.render.render();
            return;
        };

        let request = match submission::create_profile_request(config, &body) {
            Ok(request) => request,
            Err(e) => {
                let kind = ErrorKind::Configuration;
                warn!(code = kind.code(), error = %e, "could not build profile request");
                model.show_toast(submission::error_message(&e.to_string()), kind.toast_kind());
                caps.render.render();
                return;
            }
        };

        info!(
            request_id = request.request_id(),
            url = request.url().as_str(),
            timeout_ms = request.timeout_ms(),
            optional_fields = body.optional_field_count(),
            "creating profile"
        );

        model.is_loading = true;
        model.phase = SubmissionPhase::Submitting {
            request_id: request.request_id().to_string(),
        };
        model.show_toast(LOADING_MESSAGE, ToastKind::Loading);
        caps.render.render();

        caps.http
            .send(request, |result| Event::ProfileCreated(Box::new(result)));
    }

    fn profile_created(result: HttpResult, model: &mut Model, caps: &Capabilities) {
        if !model.phase.is_submitting() {
            debug!(phase = ?model.phase, "late profile response ignored");
            return;
        }

        if let Ok(response) = &result {
            debug!(
                request_id = response.request_id(),
                status = response.status(),
                duration_ms = response.duration_ms(),
                "profile response received"
            );
        }

        model.is_loading = false;

        match SubmissionOutcome::from_http_result(result) {
            SubmissionOutcome::Success { id, url } => {
                info!(profile_id = %id, "profile created, scheduling redirect");

                let timer_id = TimerId::generate();
                model.phase = SubmissionPhase::Redirecting;
                model.show_toast(SUCCESS_MESSAGE, ToastKind::Success);
                model.pending_redirect = Some(PendingRedirect {
                    timer_id: timer_id.clone(),
                    url,
                    profile_id: id,
                });

                let id = timer_id.clone();
                caps.timer.start(timer_id, REDIRECT_DELAY, move |output| {
                    Event::RedirectTimerFired { id, output }
                });
            }
            SubmissionOutcome::Failure { reason, kind } => {
                warn!(code = kind.code(), %reason, "profile creation failed");
                model.phase = SubmissionPhase::Idle;
                model.show_toast(submission::error_message(&reason), kind.toast_kind());
            }
        }

        caps.render.render();
    }

    fn redirect_timer_fired(
        id: &TimerId,
        output: TimerOutput,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let is_current = model
            .pending_redirect
            .as_ref()
            .is_some_and(|p| &p.timer_id == id);

        if !is_current || model.phase != SubmissionPhase::Redirecting {
            debug!(timer = %id, "stale redirect timer ignored");
            return;
        }

        if output == TimerOutput::Cancelled {
            debug!(timer = %id, "redirect timer cancelled");
            model.pending_redirect = None;
            caps.render.render();
            return;
        }

        if let Some(pending) = model.pending_redirect.take() {
            info!(profile_id = %pending.profile_id, "redirecting to verification");
            caps.navigate.redirect(&pending.url);
            model.phase = SubmissionPhase::Redirected;
            caps.render.render();
        }
    }
}
