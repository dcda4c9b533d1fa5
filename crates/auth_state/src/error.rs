//! Provider errors wrapped at the boundary. The hosted auth API answers with a
//! JSON body carrying a machine-readable `error_code` (newer releases) and a
//! human-readable message; both are folded into a closed [`AuthErrorKind`] here
//! so the rest of the app never matches on vendor strings.

use serde::Deserialize;
use thiserror::Error;

/// Maximum number of message characters kept from an error body.
const MAX_MESSAGE_CHARS: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    InvalidCredentials,
    EmailUnconfirmed,
    RateLimited,
    UserAlreadyRegistered,
    WeakPassword,
    SignupDisabled,
    OtpExpired,
    SessionNotFound,
    Network,
    Unknown,
}

impl AuthErrorKind {
    /// Classifies a provider failure. The error code wins, then the HTTP
    /// status, and message substrings are the last resort.
    pub fn classify(code: Option<&str>, message: &str, status: Option<u16>) -> Self {
        if let Some(kind) = code.and_then(Self::from_code) {
            return kind;
        }
        if status == Some(429) {
            return Self::RateLimited;
        }
        Self::from_message(message)
    }

    fn from_code(code: &str) -> Option<Self> {
        let kind = match code {
            "invalid_credentials" => Self::InvalidCredentials,
            "email_not_confirmed" => Self::EmailUnconfirmed,
            "over_request_rate_limit" | "over_email_send_rate_limit" | "over_sms_send_rate_limit" => {
                Self::RateLimited
            }
            "user_already_exists" | "email_exists" => Self::UserAlreadyRegistered,
            "weak_password" => Self::WeakPassword,
            "signup_disabled" | "email_provider_disabled" => Self::SignupDisabled,
            "otp_expired" | "flow_state_expired" => Self::OtpExpired,
            "session_not_found" | "session_expired" | "refresh_token_not_found" => {
                Self::SessionNotFound
            }
            _ => return None,
        };
        Some(kind)
    }

    fn from_message(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("invalid login credentials") {
            Self::InvalidCredentials
        } else if lowered.contains("email not confirmed") {
            Self::EmailUnconfirmed
        } else if lowered.contains("too many requests") || lowered.contains("rate limit") {
            Self::RateLimited
        } else if lowered.contains("user already registered") {
            Self::UserAlreadyRegistered
        } else if lowered.contains("password should be at least") {
            Self::WeakPassword
        } else if lowered.contains("signup is disabled") || lowered.contains("signups not allowed")
        {
            Self::SignupDisabled
        } else if lowered.contains("session_not_found")
            || lowered.contains("session not found")
            || lowered.contains("auth session missing")
        {
            Self::SessionNotFound
        } else if lowered.contains("expired") {
            Self::OtpExpired
        } else {
            Self::Unknown
        }
    }
}

/// Failure returned by every [`crate::client::AuthClient`] call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    kind: AuthErrorKind,
    message: String,
    status: Option<u16>,
}

#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl AuthError {
    /// Builds an error from a bare message, classifying it by content.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: AuthErrorKind::classify(None, &message, None),
            message,
            status: None,
        }
    }

    pub fn with_kind(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Transport failure before any response arrived.
    pub fn network(message: impl Into<String>) -> Self {
        Self::with_kind(AuthErrorKind::Network, message)
    }

    /// Parses a non-2xx response body from the auth API.
    pub fn from_response(status: u16, body: &str) -> Self {
        let trimmed = body.trim();
        let parsed: ErrorBody = serde_json::from_str(trimmed).unwrap_or_default();
        let message = parsed
            .msg
            .or(parsed.error_description)
            .or(parsed.message)
            .or(parsed.error)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| {
                if trimmed.is_empty() || trimmed.starts_with('{') {
                    format!("Request failed ({status}).")
                } else {
                    trimmed.to_string()
                }
            });
        let message: String = message.trim().chars().take(MAX_MESSAGE_CHARS).collect();

        Self {
            kind: AuthErrorKind::classify(parsed.error_code.as_deref(), &message, Some(status)),
            message,
            status: Some(status),
        }
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is(&self, kind: AuthErrorKind) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthError, AuthErrorKind};

    #[test]
    fn error_code_takes_precedence_over_message() {
        let body = r#"{"code":400,"error_code":"email_not_confirmed","msg":"Invalid login credentials"}"#;
        let err = AuthError::from_response(400, body);
        assert_eq!(err.kind(), AuthErrorKind::EmailUnconfirmed);
        assert_eq!(err.message(), "Invalid login credentials");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn legacy_grant_errors_fall_back_to_message() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        let err = AuthError::from_response(400, body);
        assert_eq!(err.kind(), AuthErrorKind::InvalidCredentials);
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[test]
    fn status_429_is_rate_limited() {
        let err = AuthError::from_response(429, r#"{"msg":"For security purposes, wait"}"#);
        assert!(err.is(AuthErrorKind::RateLimited));
    }

    #[test]
    fn classifies_known_messages() {
        let cases = [
            ("Email not confirmed", AuthErrorKind::EmailUnconfirmed),
            ("Too many requests", AuthErrorKind::RateLimited),
            ("User already registered", AuthErrorKind::UserAlreadyRegistered),
            (
                "Password should be at least 6 characters",
                AuthErrorKind::WeakPassword,
            ),
            ("Signups not allowed for this instance", AuthErrorKind::SignupDisabled),
            ("Token has expired or is invalid", AuthErrorKind::OtpExpired),
            ("Auth session missing!", AuthErrorKind::SessionNotFound),
            ("Something else broke", AuthErrorKind::Unknown),
        ];
        for (message, expected) in cases {
            assert_eq!(AuthError::new(message).kind(), expected, "{message}");
        }
    }

    #[test]
    fn non_json_bodies_are_kept_and_truncated() {
        let long = "x".repeat(500);
        let err = AuthError::from_response(502, &long);
        assert_eq!(err.message().len(), 200);
        assert_eq!(err.kind(), AuthErrorKind::Unknown);

        let empty = AuthError::from_response(500, "  ");
        assert_eq!(empty.message(), "Request failed (500).");
    }
}
