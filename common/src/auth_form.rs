use serde::Serialize;

use crate::api::ApiError;
use crate::validation::{
    validate_email, validate_name, validate_password, validate_password_confirmation,
    FieldState, PasswordStrength,
};

pub const AUTH_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    /// Read `mode=signup` from a query string (with or without leading `?`).
    pub fn from_query(query: &str) -> Self {
        let is_signup = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(k, v)| k == "mode" && v.eq_ignore_ascii_case("signup"));
        if is_signup {
            Self::Signup
        } else {
            Self::Login
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::Login => "Log in to Shamba",
            Self::Signup => "Create your Shamba account",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Login => "Log In",
            Self::Signup => "Sign Up",
        }
    }
}

/// Inputs shown for a mode. Both modes use plain inputs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl AuthField {
    pub fn for_mode(mode: AuthMode) -> &'static [AuthField] {
        match mode {
            AuthMode::Login => &[Self::Email, Self::Password],
            AuthMode::Signup => &[Self::Name, Self::Email, Self::Password, Self::ConfirmPassword],
        }
    }

    pub fn input_type(self) -> &'static str {
        match self {
            Self::Name => "text",
            Self::Email => "email",
            Self::Password | Self::ConfirmPassword => "password",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Full name",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
        }
    }
}

/// Body of the auth hand-off request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: FieldState,
    pub email: FieldState,
    pub password: FieldState,
    pub confirm: FieldState,
    pub error: Option<String>,
    submitting: bool,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn field(&self, field: AuthField) -> &FieldState {
        match field {
            AuthField::Name => &self.name,
            AuthField::Email => &self.email,
            AuthField::Password => &self.password,
            AuthField::ConfirmPassword => &self.confirm,
        }
    }

    pub fn input(&mut self, field: AuthField, value: String) {
        match field {
            AuthField::Name => self.name.set_value(value, validate_name),
            AuthField::Email => self.email.set_value(value, validate_email),
            AuthField::Password => {
                self.password.set_value(value, validate_password);
                if !self.confirm.value.is_empty() {
                    let password = self.password.value.clone();
                    self.confirm
                        .blur(|c| validate_password_confirmation(&password, c));
                }
            }
            AuthField::ConfirmPassword => {
                let password = self.password.value.clone();
                self.confirm
                    .set_value(value, |c| validate_password_confirmation(&password, c));
            }
        }
    }

    pub fn blur(&mut self, field: AuthField) {
        match field {
            AuthField::Name => self.name.blur(validate_name),
            AuthField::Email => self.email.blur(validate_email),
            AuthField::Password => self.password.blur(validate_password),
            AuthField::ConfirmPassword => {
                let password = self.password.value.clone();
                self.confirm
                    .blur(|c| validate_password_confirmation(&password, c));
            }
        }
    }

    /// Strength hint, only meaningful in sign-up mode.
    pub fn password_strength(&self) -> Option<PasswordStrength> {
        if self.mode != AuthMode::Signup || self.password.value.is_empty() {
            return None;
        }
        validate_password(&self.password.value).strength
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn begin_submit(&mut self) -> Option<AuthRequest> {
        if self.submitting {
            return None;
        }
        for field in AuthField::for_mode(self.mode) {
            self.blur(*field);
        }
        let all_valid = AuthField::for_mode(self.mode)
            .iter()
            .all(|f| self.field(*f).is_valid);
        if !all_valid {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(AuthRequest {
            name: (self.mode == AuthMode::Signup).then(|| self.name.value.trim().to_string()),
            email: self.email.value.trim().to_string(),
            password: self.password.value.clone(),
        })
    }

    pub fn finish_submit(&mut self, result: Result<(), ApiError>) -> bool {
        self.submitting = false;
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(mode = ?self.mode, "Authentication failed: {e}");
                self.error = Some(e.user_message(AUTH_FAILED_MESSAGE));
                false
            }
        }
    }
}
