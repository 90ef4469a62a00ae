//! Signup form controller.
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::api::model::{SignupRequest, SignupResponse};
use crate::api::SignupApi;
use crate::config::Signup as SignupConfig;
use crate::notify::Notifier;
use crate::validate::{self, Field, SignupForm};

/// What the signup page shows, keyed by form field.
pub trait SignupView: Send + Sync {
    fn show_field_error(&self, field: Field, message: &str);
    fn clear_field_error(&self, field: Field);
    /// Native constraint message on the confirmation input; `None` clears it.
    fn set_custom_validity(&self, field: Field, message: Option<&str>);
    /// Disables the submit control and shows the loading indicator, or reverts both.
    fn set_submitting(&self, submitting: bool);
    fn redirect(&self, target: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid,
    Registered,
    /// The backend refused the registration.
    Rejected(String),
    /// The request or its response failed.
    Failed,
}

pub struct SignupController<A, V, N> {
    api: A,
    view: V,
    notifier: N,
    cfg: SignupConfig,
    form: SignupForm,
    errors: BTreeMap<Field, &'static str>,
}

impl<A: SignupApi, V: SignupView, N: Notifier> SignupController<A, V, N> {
    pub fn new(api: A, view: V, notifier: N, cfg: SignupConfig) -> Self {
        Self {
            api,
            view,
            notifier,
            cfg,
            form: SignupForm::default(),
            errors: BTreeMap::new(),
        }
    }

    pub fn form(&self) -> &SignupForm {
        &self.form
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Store a typed value; password fields also re-check the live match.
    pub fn on_input(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
        if matches!(field, Field::Password | Field::ConfirmPassword) {
            let message = validate::password_match_message(&self.form);
            self.view.set_custom_validity(Field::ConfirmPassword, message);
        }
    }

    /// Validate one field as it loses focus.
    pub fn on_blur(&mut self, field: Field) -> bool {
        let result = validate::check_field(&self.form, field);
        self.apply(field, result)
    }

    fn apply(&mut self, field: Field, result: Result<(), &'static str>) -> bool {
        match result {
            Ok(()) => {
                if self.errors.remove(&field).is_some() {
                    self.view.clear_field_error(field);
                }
                true
            }
            Err(message) => {
                self.errors.insert(field, message);
                self.view.show_field_error(field, message);
                false
            }
        }
    }

    fn validate_all(&mut self) -> bool {
        let mut ok = true;
        for field in Field::ALL {
            let result = validate::check_required(&self.form, field);
            ok &= self.apply(field, result);
        }
        ok
    }

    fn request(&self) -> SignupRequest {
        SignupRequest {
            name: self.form.name.trim().to_string(),
            dob: self.form.dob.trim().to_string(),
            email: self.form.email.trim().to_string(),
            username: self.form.username.trim().to_string(),
            password: self.form.password.clone(),
        }
    }

    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.validate_all() {
            warn!(fields = ?self.errors.keys().collect::<Vec<_>>(), "signup blocked by validation");
            self.notifier.error("Please fix the errors before submitting");
            return SubmitOutcome::Invalid;
        }

        self.view.set_submitting(true);
        let request = self.request();
        let outcome = match self.api.signup(&request).await {
            Ok(response) => self.handle_response(&request.username, response),
            Err(err) => {
                error!(?err, "signup request failed");
                self.notifier.error("An error occurred. Please try again.");
                SubmitOutcome::Failed
            }
        };
        self.view.set_submitting(false);

        if outcome == SubmitOutcome::Registered {
            tokio::time::sleep(Duration::from_millis(self.cfg.redirect_delay_ms)).await;
            self.view.redirect(&self.cfg.login_page);
        }
        outcome
    }

    fn handle_response(&self, username: &str, response: SignupResponse) -> SubmitOutcome {
        if response.success {
            info!(username, "registration succeeded");
            self.notifier
                .success("Registration successful! Redirecting to login...");
            return SubmitOutcome::Registered;
        }

        let message = match response.error.as_deref() {
            Some("username_exists") => "Username already exists".to_string(),
            Some("email_exists") => "Email already registered".to_string(),
            _ => response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Registration failed".to_string()),
        };
        warn!(username, code = ?response.error, "registration rejected");
        self.notifier.error(&message);
        SubmitOutcome::Rejected(message)
    }
}
