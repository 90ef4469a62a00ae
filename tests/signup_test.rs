use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

use recycle_admin::api::model::{SignupRequest, SignupResponse};
use recycle_admin::api::{ApiError, SignupApi};
use recycle_admin::config::Signup as SignupConfig;
use recycle_admin::notify::{Level, Notifier};
use recycle_admin::signup::{SignupController, SignupView, SubmitOutcome};
use recycle_admin::validate::Field;

#[derive(Clone, Default)]
struct RecordingSignupApi {
    responses: Arc<Mutex<VecDeque<Result<SignupResponse, ApiError>>>>,
    calls: Arc<Mutex<Vec<SignupRequest>>>,
}

impl RecordingSignupApi {
    fn with_responses(responses: Vec<Result<SignupResponse, ApiError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Default::default()
        }
    }

    async fn calls(&self) -> Vec<SignupRequest> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl SignupApi for RecordingSignupApi {
    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        self.calls.lock().await.push(request.clone());
        self.responses.lock().await.pop_front().unwrap_or_else(|| {
            Ok(SignupResponse {
                success: true,
                ..Default::default()
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SignupEvent {
    ShowError(Field, String),
    ClearError(Field),
    Validity(Field, Option<String>),
    Submitting(bool),
    Redirect(String),
}

#[derive(Clone, Default)]
struct RecordingSignupView {
    events: Arc<StdMutex<Vec<SignupEvent>>>,
}

impl RecordingSignupView {
    fn events(&self) -> Vec<SignupEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: SignupEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl SignupView for RecordingSignupView {
    fn show_field_error(&self, field: Field, message: &str) {
        self.push(SignupEvent::ShowError(field, message.to_string()));
    }

    fn clear_field_error(&self, field: Field) {
        self.push(SignupEvent::ClearError(field));
    }

    fn set_custom_validity(&self, field: Field, message: Option<&str>) {
        self.push(SignupEvent::Validity(field, message.map(str::to_string)));
    }

    fn set_submitting(&self, submitting: bool) {
        self.push(SignupEvent::Submitting(submitting));
    }

    fn redirect(&self, target: &str) {
        self.push(SignupEvent::Redirect(target.to_string()));
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    messages: Arc<StdMutex<Vec<(Level, String)>>>,
}

impl RecordingNotifier {
    fn last(&self) -> Option<(Level, String)> {
        self.messages.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str) {
        self.messages.lock().unwrap().push((level, message.to_string()));
    }
}

type Controller = SignupController<RecordingSignupApi, RecordingSignupView, RecordingNotifier>;

fn controller(api: &RecordingSignupApi) -> (Controller, RecordingSignupView, RecordingNotifier) {
    let view = RecordingSignupView::default();
    let notifier = RecordingNotifier::default();
    let controller = SignupController::new(
        api.clone(),
        view.clone(),
        notifier.clone(),
        SignupConfig {
            login_page: "index.html".into(),
            redirect_delay_ms: 0,
        },
    );
    (controller, view, notifier)
}

fn fill_valid(controller: &mut Controller) {
    controller.on_input(Field::Name, "  Asha Kumar ");
    controller.on_input(Field::Dob, "2000-01-01");
    controller.on_input(Field::Email, " asha@example.com");
    controller.on_input(Field::Username, "asha ");
    controller.on_input(Field::Password, "secret1");
    controller.on_input(Field::ConfirmPassword, "secret1");
}

#[tokio::test]
async fn short_name_blocks_submit() {
    let api = RecordingSignupApi::default();
    let (mut controller, view, notifier) = controller(&api);
    fill_valid(&mut controller);
    controller.on_input(Field::Name, "A");

    assert!(!controller.on_blur(Field::Name));
    assert!(view.events().contains(&SignupEvent::ShowError(
        Field::Name,
        "Name must be at least 2 characters long".into()
    )));

    assert_eq!(controller.submit().await, SubmitOutcome::Invalid);
    assert_eq!(
        notifier.last(),
        Some((Level::Error, "Please fix the errors before submitting".into()))
    );
    assert!(api.calls().await.is_empty());
    assert!(!view.events().contains(&SignupEvent::Submitting(true)));

    controller.on_input(Field::Name, "Al");
    assert!(controller.on_blur(Field::Name));
    assert_eq!(view.events().last(), Some(&SignupEvent::ClearError(Field::Name)));
    assert!(!controller.has_errors());
}

#[tokio::test]
async fn empty_form_marks_every_field_required() {
    let api = RecordingSignupApi::default();
    let (mut controller, view, _notifier) = controller(&api);

    assert_eq!(controller.submit().await, SubmitOutcome::Invalid);
    for field in Field::ALL {
        assert!(view
            .events()
            .contains(&SignupEvent::ShowError(field, "This field is required".into())));
        assert_eq!(controller.error(field), Some("This field is required"));
    }
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn whitespace_difference_in_confirmation_fails() {
    let api = RecordingSignupApi::default();
    let (mut controller, _view, _notifier) = controller(&api);
    fill_valid(&mut controller);
    controller.on_input(Field::ConfirmPassword, "secret1 ");

    assert_eq!(controller.submit().await, SubmitOutcome::Invalid);
    assert_eq!(controller.error(Field::ConfirmPassword), Some("Passwords do not match"));
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn live_password_match_sets_validity() {
    let api = RecordingSignupApi::default();
    let (mut controller, view, _notifier) = controller(&api);
    controller.on_input(Field::Password, "secret1");
    controller.on_input(Field::ConfirmPassword, "secret");
    controller.on_input(Field::ConfirmPassword, "secret1");

    assert_eq!(
        view.events(),
        vec![
            SignupEvent::Validity(Field::ConfirmPassword, None),
            SignupEvent::Validity(Field::ConfirmPassword, Some("Passwords do not match".into())),
            SignupEvent::Validity(Field::ConfirmPassword, None),
        ]
    );
}

#[tokio::test]
async fn successful_signup_posts_trimmed_values_and_redirects() {
    let api = RecordingSignupApi::default();
    let (mut controller, view, notifier) = controller(&api);
    fill_valid(&mut controller);

    assert_eq!(controller.submit().await, SubmitOutcome::Registered);
    assert_eq!(controller.form().name, "  Asha Kumar ");
    assert_eq!(
        api.calls().await,
        vec![SignupRequest {
            name: "Asha Kumar".into(),
            dob: "2000-01-01".into(),
            email: "asha@example.com".into(),
            username: "asha".into(),
            password: "secret1".into(),
        }]
    );
    assert_eq!(
        notifier.last(),
        Some((Level::Success, "Registration successful! Redirecting to login...".into()))
    );

    let tail: Vec<SignupEvent> = view
        .events()
        .into_iter()
        .filter(|e| matches!(e, SignupEvent::Submitting(_) | SignupEvent::Redirect(_)))
        .collect();
    assert_eq!(
        tail,
        vec![
            SignupEvent::Submitting(true),
            SignupEvent::Submitting(false),
            SignupEvent::Redirect("index.html".into()),
        ]
    );
}

#[tokio::test]
async fn backend_error_codes_map_to_messages() {
    let cases = [
        (Some("username_exists"), None, "Username already exists"),
        (Some("email_exists"), None, "Email already registered"),
        (Some("weak_password"), Some("Password too weak"), "Password too weak"),
        (None, None, "Registration failed"),
    ];
    for (code, message, expected) in cases {
        let api = RecordingSignupApi::with_responses(vec![Ok(SignupResponse {
            success: false,
            error: code.map(str::to_string),
            message: message.map(str::to_string),
        })]);
        let (mut controller, view, notifier) = controller(&api);
        fill_valid(&mut controller);

        assert_eq!(
            controller.submit().await,
            SubmitOutcome::Rejected(expected.to_string())
        );
        assert_eq!(notifier.last(), Some((Level::Error, expected.to_string())));
        let events = view.events();
        assert_eq!(events.last(), Some(&SignupEvent::Submitting(false)));
        assert!(!events.iter().any(|e| matches!(e, SignupEvent::Redirect(_))));
    }
}

#[tokio::test]
async fn transport_failure_restores_submit_control() {
    let decode = serde_json::from_str::<serde_json::Value>("oops").unwrap_err();
    let api = RecordingSignupApi::with_responses(vec![Err(ApiError::Decode(decode))]);
    let (mut controller, view, notifier) = controller(&api);
    fill_valid(&mut controller);

    assert_eq!(controller.submit().await, SubmitOutcome::Failed);
    assert_eq!(
        notifier.last(),
        Some((Level::Error, "An error occurred. Please try again.".into()))
    );
    assert_eq!(view.events().last(), Some(&SignupEvent::Submitting(false)));
}
