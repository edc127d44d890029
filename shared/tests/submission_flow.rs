use crux_core::testing::AppTester;
use crux_core::Request;
use identivia_shared::capabilities::{
    HttpError, HttpHeaders, HttpOperation, HttpResponse, NavigateOperation, TimerId,
    TimerOperation, TimerOutput,
};
use identivia_shared::{App, Effect, Event, Field, Model, SubmissionPhase, ToastKind};
use secrecy::SecretString;
use serde_json::{json, Value};

fn configured() -> (AppTester<App, Effect>, Model) {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(
        Event::Configure {
            base_url: "https://kyc.example.com".into(),
            api_key: SecretString::new("key-123".into()),
        },
        &mut model,
    );
    assert!(model.config.is_some());
    (app, model)
}

fn set(app: &AppTester<App, Effect>, model: &mut Model, field: Field, value: &str) {
    app.update(
        Event::FieldChanged {
            field,
            value: value.into(),
        },
        model,
    );
}

fn http_request(effects: Vec<Effect>) -> Request<HttpOperation> {
    effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .expect("an HTTP effect")
}

fn timer_request(effects: Vec<Effect>) -> Request<TimerOperation> {
    effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Timer(request) => Some(request),
            _ => None,
        })
        .expect("a timer effect")
}

fn response(status: u16, body: &Value) -> HttpResponse {
    HttpResponse::new(
        status,
        HttpHeaders::new(),
        serde_json::to_vec(body).unwrap(),
        "req-1".into(),
        42,
    )
}

/// Submits the current form and feeds the given HTTP result back in.
fn submit_and_respond(
    app: &AppTester<App, Effect>,
    model: &mut Model,
    result: Result<HttpResponse, HttpError>,
) -> Vec<Effect> {
    let update = app.update(Event::SubmitRequested, model);
    assert!(model.is_loading);
    let mut request = http_request(update.effects);

    let update = app.resolve(&mut request, result).expect("resolves");
    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, model).effects);
    }
    effects
}

#[test]
fn missing_user_id_shows_warning_without_request() {
    let (app, mut model) = configured();

    let update = app.update(Event::SubmitRequested, &mut model);

    assert!(!update.effects.iter().any(|e| matches!(e, Effect::Http(_))));
    let toast = model.active_toast.as_ref().unwrap();
    assert_eq!(toast.message, "User ID is mandatory");
    assert_eq!(toast.kind, ToastKind::Warning);
    assert!(!model.is_loading);
    assert_eq!(model.phase, SubmissionPhase::Idle);
}

#[test]
fn invalid_email_shows_warning_without_request() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");
    set(&app, &mut model, Field::Email, "not-an-email");

    let update = app.update(Event::SubmitRequested, &mut model);

    assert!(!update.effects.iter().any(|e| matches!(e, Effect::Http(_))));
    let toast = model.active_toast.as_ref().unwrap();
    assert_eq!(toast.message, "Invalid email format");
    assert_eq!(toast.kind, ToastKind::Warning);
    assert!(!model.is_loading);
}

#[test]
fn successful_submission_redirects_after_delay() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");
    set(&app, &mut model, Field::DocumentType, "01");
    set(&app, &mut model, Field::DocumentNumber, "900101-14-5678");

    let update = app.update(Event::SubmitRequested, &mut model);
    assert!(model.is_loading);
    assert!(model.phase.is_submitting());
    assert_eq!(
        model.active_toast.as_ref().unwrap().message,
        "Creating KYC record..."
    );
    assert_eq!(model.active_toast.as_ref().unwrap().kind, ToastKind::Loading);

    let mut request = http_request(update.effects);
    let HttpOperation::Execute(sent) = &request.operation;
    assert_eq!(
        sent.url().as_str(),
        "https://kyc.example.com/api/profiles/create"
    );
    assert_eq!(sent.headers().get("x-api-key"), Some("key-123"));
    let body: Value = serde_json::from_slice(sent.body().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "userID": "user_123",
            "securityLevel": "mid",
            "documentType": "national_id",
            "documentNumber": "900101-14-5678"
        })
    );

    let update = app
        .resolve(
            &mut request,
            Ok(response(
                201,
                &json!({"id": "abc", "url": "https://verify.example/abc"}),
            )),
        )
        .expect("resolves");
    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, &mut model).effects);
    }

    assert!(!model.is_loading);
    assert_eq!(model.phase, SubmissionPhase::Redirecting);
    let toast = model.active_toast.as_ref().unwrap();
    assert_eq!(toast.message, "KYC record created successfully! Redirecting...");
    assert_eq!(toast.kind, ToastKind::Success);
    assert!(!effects.iter().any(|e| matches!(e, Effect::Navigate(_))));

    let mut timer = timer_request(effects);
    let TimerOperation::Start { millis, .. } = &timer.operation else {
        panic!("expected a timer start, got {:?}", timer.operation);
    };
    assert_eq!(*millis, 1500);

    let update = app
        .resolve(&mut timer, TimerOutput::Elapsed)
        .expect("resolves");
    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, &mut model).effects);
    }

    let navigation = effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Navigate(request) => Some(request.operation),
            _ => None,
        })
        .expect("a navigation effect");
    assert_eq!(
        navigation,
        NavigateOperation::Redirect {
            url: "https://verify.example/abc".into()
        }
    );
    assert_eq!(model.phase, SubmissionPhase::Redirected);
    assert!(model.pending_redirect.is_none());
}

#[test]
fn server_error_shows_status_and_stays_on_form() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");

    let effects = submit_and_respond(
        &app,
        &mut model,
        Ok(response(500, &json!({"error": "internal"}))),
    );

    assert!(!model.is_loading);
    assert_eq!(model.phase, SubmissionPhase::Idle);
    let toast = model.active_toast.as_ref().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.starts_with("Error: "));
    assert!(toast.message.contains("500"));
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::Timer(_) | Effect::Navigate(_))));
    assert!(model.pending_redirect.is_none());
    assert_eq!(model.fields.user_id, "user_123");
}

#[test]
fn response_without_id_or_url_is_a_failure() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");

    let effects = submit_and_respond(&app, &mut model, Ok(response(200, &json!({}))));

    let toast = model.active_toast.as_ref().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.contains("missing ID or URL"));
    assert!(!model.is_loading);
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::Timer(_) | Effect::Navigate(_))));
}

#[test]
fn transport_error_returns_to_form() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");

    submit_and_respond(
        &app,
        &mut model,
        Err(HttpError::Timeout {
            timeout_ms: 30_000,
            request_id: "req-1".into(),
        }),
    );

    assert!(!model.is_loading);
    assert!(model.can_submit());
    let toast = model.active_toast.as_ref().unwrap();
    assert_eq!(toast.message, "Error: timeout after 30000ms");
}

#[test]
fn failed_attempt_can_be_retried() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");

    submit_and_respond(&app, &mut model, Ok(response(503, &json!({}))));
    let update = app.update(Event::SubmitRequested, &mut model);

    assert!(update.effects.iter().any(|e| matches!(e, Effect::Http(_))));
    assert!(model.is_loading);
}

#[test]
fn submit_while_in_flight_is_ignored() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");

    let first = app.update(Event::SubmitRequested, &mut model);
    assert!(first.effects.iter().any(|e| matches!(e, Effect::Http(_))));

    let second = app.update(Event::SubmitRequested, &mut model);
    assert!(second.effects.is_empty());
    assert!(model.is_loading);
    assert!(!model.can_submit());
}

#[test]
fn unconfigured_submit_shows_error_without_loading() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    set(&app, &mut model, Field::UserId, "user_123");

    let update = app.update(Event::SubmitRequested, &mut model);

    assert!(!update.effects.iter().any(|e| matches!(e, Effect::Http(_))));
    assert!(!model.is_loading);
    let toast = model.active_toast.as_ref().unwrap();
    assert_eq!(toast.message, "Profile service is not configured");
    assert_eq!(toast.kind, ToastKind::Error);
}

#[test]
fn invalid_configuration_is_surfaced_in_view() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::Configure {
            base_url: "not a url".into(),
            api_key: SecretString::new("key".into()),
        },
        &mut model,
    );

    assert!(model.config.is_none());
    let view = app.view(&model);
    assert!(view.config_error.unwrap().contains("invalid API base URL"));
    assert!(!view.can_submit);
}

#[test]
fn session_close_cancels_pending_redirect() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");

    let effects = submit_and_respond(
        &app,
        &mut model,
        Ok(response(
            200,
            &json!({"id": 7, "url": "https://verify.example/7"}),
        )),
    );
    let mut start = timer_request(effects);
    let TimerOperation::Start { id: started, .. } = start.operation.clone() else {
        panic!("expected a timer start");
    };

    let update = app.update(Event::SessionClosed, &mut model);
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));
    let cancel = timer_request(update.effects);
    assert_eq!(cancel.operation, TimerOperation::Cancel { id: started });
    assert_eq!(model.phase, SubmissionPhase::Closed);
    assert!(model.pending_redirect.is_none());

    // The shell may still resolve the original timer; nothing navigates.
    let update = app
        .resolve(&mut start, TimerOutput::Elapsed)
        .expect("resolves");
    for event in update.events {
        let update = app.update(event, &mut model);
        assert!(!update
            .effects
            .iter()
            .any(|e| matches!(e, Effect::Navigate(_))));
    }
}

#[test]
fn stale_timer_never_navigates() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");

    submit_and_respond(
        &app,
        &mut model,
        Ok(response(
            200,
            &json!({"id": "abc", "url": "https://verify.example/abc"}),
        )),
    );

    let update = app.update(
        Event::RedirectTimerFired {
            id: TimerId::generate(),
            output: TimerOutput::Elapsed,
        },
        &mut model,
    );

    assert!(update.effects.is_empty());
    assert_eq!(model.phase, SubmissionPhase::Redirecting);
    assert!(model.pending_redirect.is_some());
}

#[test]
fn document_number_follows_document_type() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    set(&app, &mut model, Field::DocumentNumber, "A1234567");
    assert_eq!(model.fields.document_number, "");
    assert!(!app.view(&model).form.document_number_enabled);

    set(&app, &mut model, Field::DocumentType, "passport");
    set(&app, &mut model, Field::DocumentNumber, "A1234567");
    assert_eq!(model.fields.document_number, "A1234567");
    assert!(app.view(&model).form.document_number_enabled);

    set(&app, &mut model, Field::DocumentType, "");
    assert_eq!(model.fields.document_number, "");
}

#[test]
fn view_reflects_pending_redirect_and_toast() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");

    submit_and_respond(
        &app,
        &mut model,
        Ok(response(
            200,
            &json!({"id": "abc", "url": "https://verify.example/abc"}),
        )),
    );

    let view = app.view(&model);
    assert_eq!(
        view.pending_redirect.as_deref(),
        Some("https://verify.example/abc")
    );
    assert_eq!(view.toast.as_ref().unwrap().duration_ms, Some(2000));
    assert!(!view.can_submit);
    assert_eq!(view.form.options.security_level.len(), 3);

    app.update(Event::DismissToast, &mut model);
    assert!(app.view(&model).toast.is_none());
}

#[test]
fn relative_redirect_target_is_navigated_verbatim() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");

    let effects = submit_and_respond(
        &app,
        &mut model,
        Ok(response(200, &json!({"id": "abc", "url": "/verify/abc"}))),
    );
    assert_eq!(model.phase, SubmissionPhase::Redirecting);

    let mut timer = timer_request(effects);
    let update = app
        .resolve(&mut timer, TimerOutput::Elapsed)
        .expect("resolves");
    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, &mut model).effects);
    }

    let navigation = effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Navigate(request) => Some(request.operation),
            _ => None,
        })
        .expect("a navigation effect");
    assert_eq!(
        navigation,
        NavigateOperation::Redirect {
            url: "/verify/abc".into()
        }
    );
}

#[test]
fn redirecting_session_ignores_submit_and_shell_cancelled_timer() {
    let (app, mut model) = configured();
    set(&app, &mut model, Field::UserId, "user_123");

    let effects = submit_and_respond(
        &app,
        &mut model,
        Ok(response(
            200,
            &json!({"id": "abc", "url": "https://verify.example/abc"}),
        )),
    );
    let mut start = timer_request(effects);

    let update = app.update(Event::SubmitRequested, &mut model);
    assert!(update.effects.is_empty());
    assert_eq!(model.phase, SubmissionPhase::Redirecting);
    assert!(model.pending_redirect.is_some());

    let update = app
        .resolve(&mut start, TimerOutput::Cancelled)
        .expect("resolves");
    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, &mut model).effects);
    }

    assert!(!effects.iter().any(|e| matches!(e, Effect::Navigate(_))));
    assert!(effects.iter().any(|e| matches!(e, Effect::Render(_))));
    assert!(model.pending_redirect.is_none());
    assert_eq!(model.phase, SubmissionPhase::Redirecting);
    assert!(app.view(&model).pending_redirect.is_none());

    let update = app.update(Event::SubmitRequested, &mut model);
    assert!(update.effects.is_empty());
    assert!(!model.can_submit());
}
