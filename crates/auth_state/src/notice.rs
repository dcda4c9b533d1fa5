//! User-facing copy for failed auth flows, plus the toast queue model.
//!
//! Pages match on [`AuthErrorKind`] only through these functions, so the
//! wording for each flow lives in one place.

use crate::{error::AuthError, error::AuthErrorKind, validation::Field};
use std::collections::VecDeque;

const FALLBACK: &str = "An unexpected error occurred. Please try again.";

/// Toasts shown at once; older ones are dropped first.
pub const MAX_TOASTS: usize = 5;
/// Auto-dismiss delay for toasts.
pub const TOAST_TIMEOUT_MS: u32 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastSpec {
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
}

impl ToastSpec {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(ToastLevel::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(ToastLevel::Error, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(ToastLevel::Info, title, message)
    }

    fn build(level: ToastLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub spec: ToastSpec,
}

#[derive(Clone, Debug, Default)]
pub struct ToastQueue {
    next_id: u64,
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a toast and returns its id for later dismissal.
    pub fn push(&mut self, spec: ToastSpec) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.toasts.push_back(Toast { id, spec });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// What a page shows after a failed call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FailureNotice {
    /// Inline message above the form.
    pub banner: Option<String>,
    /// Message attached to a single field instead of the banner.
    pub field: Option<(Field, String)>,
    pub toast: Option<ToastSpec>,
    pub show_verification_help: bool,
    /// The flow should continue as if it succeeded.
    pub treat_as_sent: bool,
}

impl FailureNotice {
    fn banner(message: impl Into<String>, toast: ToastSpec) -> Self {
        Self {
            banner: Some(message.into()),
            toast: Some(toast),
            ..Self::default()
        }
    }

    fn field(field: Field, message: impl Into<String>, toast: ToastSpec) -> Self {
        Self {
            field: Some((field, message.into())),
            toast: Some(toast),
            ..Self::default()
        }
    }
}

fn message_or_fallback(err: &AuthError) -> String {
    if err.message().trim().is_empty() {
        FALLBACK.to_string()
    } else {
        err.message().to_string()
    }
}

pub fn login_failure(err: &AuthError) -> FailureNotice {
    match err.kind() {
        AuthErrorKind::InvalidCredentials => FailureNotice::banner(
            "Invalid email or password. Please check your credentials and try again.",
            ToastSpec::error("Login failed", "Invalid email or password."),
        ),
        AuthErrorKind::EmailUnconfirmed => FailureNotice {
            show_verification_help: true,
            ..FailureNotice::banner(
                "This email address needs to be verified. If you have an account with this email, please check your inbox for a verification link.",
                ToastSpec::error("Email not confirmed", "Please verify your email first."),
            )
        },
        AuthErrorKind::RateLimited => FailureNotice::banner(
            "Too many login attempts. Please wait a moment before trying again.",
            ToastSpec::error("Too many attempts", "Please wait before trying again."),
        ),
        _ => {
            let message = message_or_fallback(err);
            FailureNotice::banner(message.clone(), ToastSpec::error("Login failed", message))
        }
    }
}

pub fn signup_failure(err: &AuthError) -> FailureNotice {
    match err.kind() {
        AuthErrorKind::UserAlreadyRegistered => FailureNotice::field(
            Field::Email,
            "An account with this email already exists",
            ToastSpec::error("Account exists", "Please try signing in instead."),
        ),
        AuthErrorKind::WeakPassword => FailureNotice::field(
            Field::Password,
            "Password must be at least 6 characters long",
            ToastSpec::error("Weak password", "Please choose a stronger password."),
        ),
        AuthErrorKind::SignupDisabled => FailureNotice::banner(
            "Account registration is currently disabled. Please contact support.",
            ToastSpec::error(
                "Registration unavailable",
                "Please contact support for assistance.",
            ),
        ),
        AuthErrorKind::RateLimited => FailureNotice::banner(
            "Too many signup attempts. Please wait a moment before trying again.",
            ToastSpec::error("Too many attempts", "Please wait before trying again."),
        ),
        _ => {
            let message = message_or_fallback(err);
            FailureNotice::banner(message.clone(), ToastSpec::error("Signup failed", message))
        }
    }
}

pub const RESET_LINK_SENT: &str =
    "If an account with this email exists, you will receive a password reset link.";

/// Only rate limiting is reported; other failures look like success so the
/// form does not reveal which addresses have accounts.
pub fn forgot_password_failure(err: &AuthError) -> FailureNotice {
    match err.kind() {
        AuthErrorKind::RateLimited => FailureNotice::banner(
            "Too many reset requests. Please wait a moment before trying again.",
            ToastSpec::error("Too many attempts", "Please wait before trying again."),
        ),
        _ => FailureNotice {
            toast: Some(ToastSpec::success("Email Sent!", RESET_LINK_SENT)),
            treat_as_sent: true,
            ..FailureNotice::default()
        },
    }
}

/// Outcome of a failed password update on the reset page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetFailure {
    /// The recovery session is gone; the link must be requested again.
    Expired(String),
    Notice(FailureNotice),
}

pub fn reset_password_failure(err: &AuthError) -> ResetFailure {
    match err.kind() {
        AuthErrorKind::SessionNotFound | AuthErrorKind::OtpExpired => ResetFailure::Expired(
            "Your reset session has expired. Please request a new password reset.".to_string(),
        ),
        AuthErrorKind::WeakPassword => ResetFailure::Notice(FailureNotice::field(
            Field::Password,
            "Password must be at least 6 characters long",
            ToastSpec::error("Weak password", "Please choose a stronger password."),
        )),
        _ => {
            let message = if err.message().trim().is_empty() {
                "Failed to update password. Please try again.".to_string()
            } else {
                err.message().to_string()
            };
            ResetFailure::Notice(FailureNotice::banner(
                message.clone(),
                ToastSpec::error("Update Failed", message),
            ))
        }
    }
}

pub fn resend_failure(err: &AuthError) -> ToastSpec {
    match err.kind() {
        AuthErrorKind::RateLimited => ToastSpec::error(
            "Too many attempts",
            "Please wait a moment before requesting another email.",
        ),
        _ if err.message().trim().is_empty() => {
            ToastSpec::error("Failed to Send", "Could not send verification email.")
        }
        _ => ToastSpec::error("Failed to Send", err.message()),
    }
}

pub fn resend_success() -> ToastSpec {
    ToastSpec::success("Email Sent!", "Please check your inbox for the verification link.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_maps_each_kind() {
        let invalid = login_failure(&AuthError::new("Invalid login credentials"));
        assert!(invalid.banner.as_deref().unwrap_or_default().starts_with("Invalid email or password"));
        assert!(!invalid.show_verification_help);

        let unconfirmed = login_failure(&AuthError::new("Email not confirmed"));
        assert!(unconfirmed.show_verification_help);

        let other = login_failure(&AuthError::new("Database is on fire"));
        assert_eq!(other.banner.as_deref(), Some("Database is on fire"));
        assert_eq!(
            other.toast.map(|toast| toast.title),
            Some("Login failed".to_string())
        );
    }

    #[test]
    fn signup_attaches_field_errors() {
        let exists = signup_failure(&AuthError::new("User already registered"));
        assert_eq!(
            exists.field,
            Some((Field::Email, "An account with this email already exists".to_string()))
        );
        assert!(exists.banner.is_none());

        let disabled = signup_failure(&AuthError::new("Signup is disabled"));
        assert!(disabled.banner.is_some());
    }

    #[test]
    fn forgot_password_hides_account_existence() {
        let unknown = forgot_password_failure(&AuthError::new("User not found"));
        assert!(unknown.treat_as_sent);
        assert!(unknown.banner.is_none());

        let limited = forgot_password_failure(&AuthError::from_response(429, "{}"));
        assert!(!limited.treat_as_sent);
        assert!(limited.banner.is_some());
    }

    #[test]
    fn reset_detects_expired_sessions() {
        let expired = reset_password_failure(&AuthError::new("Auth session missing!"));
        assert!(matches!(expired, ResetFailure::Expired(_)));

        let weak = reset_password_failure(&AuthError::new(
            "Password should be at least 6 characters",
        ));
        assert!(matches!(weak, ResetFailure::Notice(notice) if notice.field.is_some()));
    }

    #[test]
    fn toast_queue_is_bounded_and_dismissable() {
        let mut queue = ToastQueue::new();
        let first = queue.push(ToastSpec::info("a", "b"));
        for _ in 0..MAX_TOASTS {
            queue.push(ToastSpec::info("c", "d"));
        }
        assert_eq!(queue.len(), MAX_TOASTS);
        assert!(!queue.dismiss(first));

        let last = queue.iter().last().map(|toast| toast.id).unwrap_or_default();
        assert!(queue.dismiss(last));
        assert_eq!(queue.len(), MAX_TOASTS - 1);
    }
}
