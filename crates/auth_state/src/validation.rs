//! Form validation for the account pages. Each form returns every failing
//! field at once so the page can show them together.

use regex::Regex;
use std::{collections::BTreeMap, sync::LazyLock};

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_BIO_CHARS: usize = 500;

#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Bio,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    fn check(&mut self, field: Field, result: Option<&'static str>) {
        if let Some(message) = result {
            self.insert(field, message);
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn email(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some("Email is required")
    } else if !is_valid_email(value) {
        Some("Please enter a valid email")
    } else {
        None
    }
}

fn password(value: &str, required: &'static str) -> Option<&'static str> {
    if value.is_empty() {
        Some(required)
    } else if value.chars().count() < MIN_PASSWORD_CHARS {
        Some("Password must be at least 6 characters")
    } else {
        None
    }
}

fn confirmation(value: &str, password: &str, required: &'static str) -> Option<&'static str> {
    if value.is_empty() {
        Some(required)
    } else if value != password {
        Some("Passwords do not match")
    } else {
        None
    }
}

fn name(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some("Name is required")
    } else if trimmed.chars().count() < MIN_NAME_CHARS {
        Some("Name must be at least 2 characters")
    } else {
        None
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(Field::Email, email(&self.email));
        errors.check(Field::Password, password(&self.password, "Password is required"));
        errors
    }
}

#[derive(Clone, Debug, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(Field::Name, name(&self.name));
        errors.check(Field::Email, email(&self.email));
        errors.check(Field::Password, password(&self.password, "Password is required"));
        errors.check(
            Field::ConfirmPassword,
            confirmation(
                &self.confirm_password,
                &self.password,
                "Please confirm your password",
            ),
        );
        errors
    }
}

#[derive(Clone, Debug, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(Field::Email, email(&self.email));
        errors
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

impl NewPasswordForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(
            Field::Password,
            password(&self.password, "New password is required"),
        );
        errors.check(
            Field::ConfirmPassword,
            confirmation(
                &self.confirm_password,
                &self.password,
                "Please confirm your new password",
            ),
        );
        errors
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProfileForm {
    pub name: String,
    pub bio: String,
    pub location: String,
}

impl ProfileForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.bio.chars().count() > MAX_BIO_CHARS {
            errors.insert(Field::Bio, "Bio must be 500 characters or less");
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert_eq!(email(""), Some("Email is required"));
        assert_eq!(email("   "), Some("Email is required"));
        assert_eq!(email("invalid-email"), Some("Please enter a valid email"));
        assert_eq!(email("a b@c.de"), Some("Please enter a valid email"));
        assert_eq!(email("test@example.com"), None);
    }

    #[test]
    fn login_reports_every_field() {
        let errors = LoginForm::default().validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Password), Some("Password is required"));

        let short = LoginForm {
            email: "test@example.com".to_string(),
            password: "12345".to_string(),
        };
        assert_eq!(
            short.validate().get(Field::Password),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn signup_checks_name_and_confirmation() {
        let form = SignupForm {
            name: " a ".to_string(),
            email: "new@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        };
        let errors = form.validate();
        assert_eq!(errors.get(Field::Name), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get(Field::ConfirmPassword), Some("Passwords do not match"));
        assert_eq!(errors.get(Field::Email), None);
    }

    #[test]
    fn reset_form_uses_its_own_copy() {
        let errors = NewPasswordForm::default().validate();
        assert_eq!(errors.get(Field::Password), Some("New password is required"));
        assert_eq!(
            errors.get(Field::ConfirmPassword),
            Some("Please confirm your new password")
        );
        let ok = NewPasswordForm {
            password: "longenough".to_string(),
            confirm_password: "longenough".to_string(),
        };
        assert!(ok.validate().into_result().is_ok());
    }

    #[test]
    fn bio_is_bounded() {
        let form = ProfileForm {
            bio: "x".repeat(MAX_BIO_CHARS + 1),
            ..ProfileForm::default()
        };
        assert!(form.validate().get(Field::Bio).is_some());
        assert!(ProfileForm::default().validate().is_empty());
    }
}
