//! Field rules for the signup form.
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub const REQUIRED: &str = "This field is required";
pub const PASSWORDS_DIFFER: &str = "Passwords do not match";

/// Inputs of the signup form, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Dob,
    Email,
    Username,
    Password,
    ConfirmPassword,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Dob,
        Field::Email,
        Field::Username,
        Field::Password,
        Field::ConfirmPassword,
    ];

    /// Element id on the signup page.
    pub fn id(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Dob => "dob",
            Field::Email => "email",
            Field::Username => "username",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Raw values of the signup form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub dob: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Dob => &self.dob,
            Field::Email => &self.email,
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Dob => self.dob = value,
            Field::Email => self.email = value,
            Field::Username => self.username = value,
            Field::Password => self.password = value,
            Field::ConfirmPassword => self.confirm_password = value,
        }
    }
}

fn min_chars(value: &str, min: usize, message: &'static str) -> Result<(), &'static str> {
    if value.chars().count() < min {
        Err(message)
    } else {
        Ok(())
    }
}

/// Rule check for a single field, as run on blur. Does not enforce presence.
pub fn check_field(form: &SignupForm, field: Field) -> Result<(), &'static str> {
    let value = form.value(field).trim();
    match field {
        Field::Name => min_chars(value, 2, "Name must be at least 2 characters long"),
        Field::Email => {
            if EMAIL.is_match(value) {
                Ok(())
            } else {
                Err("Please enter a valid email address")
            }
        }
        Field::Username => min_chars(value, 3, "Username must be at least 3 characters long"),
        Field::Password => min_chars(value, 6, "Password must be at least 6 characters long"),
        Field::ConfirmPassword => {
            if form.confirm_password == form.password {
                Ok(())
            } else {
                Err(PASSWORDS_DIFFER)
            }
        }
        Field::Dob => Ok(()),
    }
}

/// Presence plus rule check, as run on submit.
pub fn check_required(form: &SignupForm, field: Field) -> Result<(), &'static str> {
    if form.value(field).trim().is_empty() {
        return Err(REQUIRED);
    }
    check_field(form, field)
}

/// Live mismatch message for the confirmation input, cleared while it is empty.
pub fn password_match_message(form: &SignupForm) -> Option<&'static str> {
    if !form.confirm_password.is_empty() && form.confirm_password != form.password {
        Some(PASSWORDS_DIFFER)
    } else {
        None
    }
}
