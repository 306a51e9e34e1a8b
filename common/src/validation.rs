use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Kenyan mobile numbers: +2547XXXXXXXX, 2547XXXXXXXX or 07XXXXXXXX.
static KE_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+254|254|0)7\d{8}$").expect("valid phone pattern"));

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Password length at which strength can reach `Good` or `Strong`.
pub const STRONG_PASSWORD_LEN: usize = 8;

/// Minimum trimmed length of a person or product name.
pub const MIN_NAME_LEN: usize = 2;

/// Coarse password strength shown under the password input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Strong => "strong",
        }
    }
}

/// Which contact type matched in [`validate_email_or_phone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Email,
    Phone,
}

/// Outcome of validating a single field. Validators never fail; every
/// outcome is one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldVerdict {
    pub is_valid: bool,
    pub error: Option<String>,
    pub strength: Option<PasswordStrength>,
    pub contact_kind: Option<ContactKind>,
}

impl FieldVerdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
            strength: None,
            contact_kind: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            strength: None,
            contact_kind: None,
        }
    }

    fn with_strength(mut self, strength: PasswordStrength) -> Self {
        self.strength = Some(strength);
        self
    }

    fn with_contact(mut self, kind: ContactKind) -> Self {
        self.contact_kind = Some(kind);
        self
    }
}

pub fn validate_email(email: &str) -> FieldVerdict {
    if email.is_empty() {
        return FieldVerdict::invalid("Email is required");
    }
    if !EMAIL_RE.is_match(email) {
        return FieldVerdict::invalid("Please enter a valid email address");
    }
    FieldVerdict::valid()
}

pub fn validate_password(password: &str) -> FieldVerdict {
    if password.is_empty() {
        return FieldVerdict::invalid("Password is required");
    }
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return FieldVerdict::invalid(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ))
        .with_strength(PasswordStrength::Weak);
    }
    if len < STRONG_PASSWORD_LEN {
        return FieldVerdict::valid().with_strength(PasswordStrength::Fair);
    }
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if has_upper && has_digit {
        FieldVerdict::valid().with_strength(PasswordStrength::Strong)
    } else {
        FieldVerdict::valid().with_strength(PasswordStrength::Good)
    }
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> FieldVerdict {
    if confirmation.is_empty() {
        return FieldVerdict::invalid("Please confirm your password");
    }
    if password != confirmation {
        return FieldVerdict::invalid("Passwords do not match");
    }
    FieldVerdict::valid()
}

pub fn validate_name(name: &str) -> FieldVerdict {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return FieldVerdict::invalid("Name is required");
    }
    if trimmed.chars().count() < MIN_NAME_LEN {
        return FieldVerdict::invalid(format!(
            "Name must be at least {MIN_NAME_LEN} characters"
        ));
    }
    FieldVerdict::valid()
}

/// Drop formatting characters, keeping digits and a single leading `+`.
pub fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    let mut out = String::with_capacity(trimmed.len());
    if trimmed.starts_with('+') {
        out.push('+');
    }
    out.extend(trimmed.chars().filter(char::is_ascii_digit));
    out
}

pub fn validate_phone(phone: &str) -> FieldVerdict {
    if phone.trim().is_empty() {
        return FieldVerdict::invalid("Phone number is required");
    }
    if !KE_PHONE_RE.is_match(&normalize_phone(phone)) {
        return FieldVerdict::invalid(
            "Please enter a valid Kenyan phone number (e.g. 0712345678)",
        );
    }
    FieldVerdict::valid()
}

pub fn validate_email_or_phone(value: &str) -> FieldVerdict {
    if value.trim().is_empty() {
        return FieldVerdict::invalid("Email or phone number is required");
    }
    if EMAIL_RE.is_match(value.trim()) {
        return FieldVerdict::valid().with_contact(ContactKind::Email);
    }
    if KE_PHONE_RE.is_match(&normalize_phone(value)) {
        return FieldVerdict::valid().with_contact(ContactKind::Phone);
    }
    FieldVerdict::invalid("Please enter a valid email address or phone number")
}

/// Per-input state driving a form control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub touched: bool,
    pub error: Option<String>,
    pub is_valid: bool,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new value and re-run the validator against it.
    pub fn set_value(&mut self, value: impl Into<String>, validator: impl Fn(&str) -> FieldVerdict) {
        self.value = value.into();
        self.apply(validator(&self.value));
    }

    /// Mark the field touched and re-validate.
    pub fn blur(&mut self, validator: impl Fn(&str) -> FieldVerdict) {
        self.touched = true;
        self.apply(validator(&self.value));
    }

    fn apply(&mut self, verdict: FieldVerdict) {
        self.is_valid = verdict.is_valid;
        self.error = verdict.error;
    }

    /// Error text to render; untouched fields stay quiet.
    pub fn visible_error(&self) -> Option<&str> {
        if self.touched {
            self.error.as_deref()
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_simple_addresses() {
        for email in ["a@b.co", "farmer.jane@shamba.co.ke", "x+tag@mail.example.org"] {
            let v = validate_email(email);
            assert!(v.is_valid, "{email} should be valid");
            assert!(v.error.is_none());
        }
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for email in ["", "plain", "a@b", "a b@c.de", "@b.co", "a@.", "a@@b.co"] {
            let v = validate_email(email);
            assert!(!v.is_valid, "{email:?} should be invalid");
            assert!(!v.error.unwrap_or_default().is_empty());
        }
    }

    #[test]
    fn empty_email_is_required() {
        assert_eq!(
            validate_email("").error.as_deref(),
            Some("Email is required")
        );
    }

    #[test]
    fn password_strength_tiers() {
        let weak = validate_password("abc");
        assert!(!weak.is_valid);
        assert_eq!(weak.strength, Some(PasswordStrength::Weak));

        let fair = validate_password("abcdef");
        assert!(fair.is_valid);
        assert_eq!(fair.strength, Some(PasswordStrength::Fair));

        let good = validate_password("abcdefgh");
        assert!(good.is_valid);
        assert_eq!(good.strength, Some(PasswordStrength::Good));

        let strong = validate_password("Abcdefg1");
        assert!(strong.is_valid);
        assert_eq!(strong.strength, Some(PasswordStrength::Strong));
    }

    #[test]
    fn password_missing_digit_is_only_good() {
        assert_eq!(
            validate_password("Abcdefgh").strength,
            Some(PasswordStrength::Good)
        );
        assert_eq!(
            validate_password("abcdefg1").strength,
            Some(PasswordStrength::Good)
        );
    }

    #[test]
    fn empty_password_has_no_strength() {
        let v = validate_password("");
        assert!(!v.is_valid);
        assert_eq!(v.strength, None);
    }

    #[test]
    fn confirmation_must_match() {
        assert!(validate_password_confirmation("secret1", "secret1").is_valid);
        assert!(!validate_password_confirmation("secret1", "secret2").is_valid);
        assert!(!validate_password_confirmation("secret1", "").is_valid);
    }

    #[test]
    fn name_is_trimmed() {
        assert!(validate_name("Wanjiru").is_valid);
        assert!(!validate_name("   ").is_valid);
        assert!(!validate_name(" J ").is_valid);
        assert!(validate_name(" Jo ").is_valid);
    }

    #[test]
    fn kenyan_phone_formats() {
        assert!(validate_phone("0712345678").is_valid);
        assert!(validate_phone("+254712345678").is_valid);
        assert!(validate_phone("254712345678").is_valid);
        assert!(validate_phone("0712 345 678").is_valid);
        assert!(validate_phone("+254 (712) 345-678").is_valid);

        assert!(!validate_phone("0612345678").is_valid);
        assert!(!validate_phone("071234567").is_valid);
        assert!(!validate_phone("07123456789").is_valid);
        assert!(!validate_phone("").is_valid);
    }

    #[test]
    fn normalize_keeps_only_leading_plus() {
        assert_eq!(normalize_phone(" +254-712 345 678 "), "+254712345678");
        assert_eq!(normalize_phone("07+12"), "0712");
    }

    #[test]
    fn email_or_phone_reports_kind() {
        let email = validate_email_or_phone("buyer@example.com");
        assert!(email.is_valid);
        assert_eq!(email.contact_kind, Some(ContactKind::Email));

        let phone = validate_email_or_phone("0722000111");
        assert!(phone.is_valid);
        assert_eq!(phone.contact_kind, Some(ContactKind::Phone));

        let neither = validate_email_or_phone("call me");
        assert!(!neither.is_valid);
        assert_eq!(neither.contact_kind, None);
    }

    #[test]
    fn field_state_hides_error_until_blur() {
        let mut field = FieldState::new();
        field.set_value("nope", validate_email);
        assert!(!field.is_valid);
        assert!(field.error.is_some());
        assert_eq!(field.visible_error(), None);

        field.blur(validate_email);
        assert_eq!(
            field.visible_error(),
            Some("Please enter a valid email address")
        );

        field.set_value("ok@shamba.co.ke", validate_email);
        assert!(field.is_valid);
        assert_eq!(field.visible_error(), None);

        field.reset();
        assert_eq!(field, FieldState::default());
    }
}
