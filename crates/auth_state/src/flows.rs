//! Email link flows: parsing confirmation and recovery links and the page
//! states they drive.

use crate::{
    client::OtpKind,
    error::{AuthError, AuthErrorKind},
    routes::{self, paths},
};
use std::collections::HashMap;
use thiserror::Error;
use url::form_urlencoded;

/// Delay before leaving the confirmation page after success.
pub const CONFIRM_REDIRECT_DELAY_MS: u32 = 2_000;
/// Delay before leaving the reset page after the password changed.
pub const RESET_REDIRECT_DELAY_MS: u32 = 3_000;

fn parse_pairs(input: &str) -> HashMap<String, String> {
    let input = input.trim_start_matches(['?', '#']);
    form_urlencoded::parse(input.as_bytes())
        .into_owned()
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Invalid verification link. Please check your email for the correct link.")]
    Missing,
    #[error("This link has expired. Please request a new one.")]
    Expired,
    #[error("{0}")]
    Invalid(String),
}

/// `/auth/confirm?token_hash=..&type=email&next=..&email=..`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmLink {
    pub token_hash: String,
    pub kind: OtpKind,
    pub next: String,
    pub email: Option<String>,
}

impl ConfirmLink {
    /// Parses the query string. On failure the optional email is still
    /// returned so the page can offer a resend.
    pub fn parse(query: &str) -> Result<Self, (LinkError, Option<String>)> {
        let pairs = parse_pairs(query);
        let email = pairs
            .get("email")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let token_hash = pairs
            .get("token_hash")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let kind = pairs
            .get("type")
            .and_then(|value| OtpKind::parse(value))
            .filter(|kind| matches!(kind, OtpKind::Email | OtpKind::Signup));

        match (token_hash, kind) {
            (Some(token_hash), Some(kind)) => Ok(Self {
                token_hash,
                kind,
                next: routes::sanitize_next(pairs.get("next").map(String::as_str))
                    .unwrap_or(paths::DASHBOARD)
                    .to_string(),
                email,
            }),
            _ => Err((LinkError::Missing, email)),
        }
    }

    /// Token prefix safe to log.
    pub fn token_hint(&self) -> String {
        let prefix: String = self.token_hash.chars().take(8).collect();
        format!("{prefix}...")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationStatus {
    Verifying,
    Verified,
    Expired,
    Invalid,
    Failed(String),
}

impl VerificationStatus {
    pub fn from_error(err: &AuthError) -> Self {
        match err.kind() {
            AuthErrorKind::OtpExpired => Self::Expired,
            _ if err.message().trim().is_empty() => {
                Self::Failed("Failed to verify email. Please try again.".to_string())
            }
            _ => Self::Failed(err.message().to_string()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Verifying => "Verifying your email...",
            Self::Verified => "Email verified successfully! Redirecting to your dashboard...",
            Self::Expired => "Your verification link has expired. Please request a new one.",
            Self::Invalid => {
                "Invalid verification link. Please check your email for the correct link."
            }
            Self::Failed(message) => message,
        }
    }

    pub fn offers_resend(&self) -> bool {
        matches!(self, Self::Expired | Self::Invalid | Self::Failed(_))
    }
}

/// Credentials carried by a password recovery link.
#[derive(Clone, PartialEq, Eq)]
pub enum RecoveryLink {
    TokenHash(String),
    Tokens {
        access_token: String,
        refresh_token: String,
    },
}

impl std::fmt::Debug for RecoveryLink {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenHash(_) => formatter.write_str("RecoveryLink::TokenHash"),
            Self::Tokens { .. } => formatter.write_str("RecoveryLink::Tokens"),
        }
    }
}

impl RecoveryLink {
    /// Reads `?token_hash=..&type=recovery` or the provider's implicit-flow
    /// fragment `#access_token=..&refresh_token=..&type=recovery`. Error
    /// fragments (`#error_code=otp_expired`) are reported as such.
    pub fn parse(query: &str, fragment: &str) -> Result<Self, LinkError> {
        let fragment_pairs = parse_pairs(fragment);
        let query_pairs = parse_pairs(query);

        for pairs in [&fragment_pairs, &query_pairs] {
            if let Some(code) = pairs.get("error_code").or_else(|| pairs.get("error")) {
                let description = pairs
                    .get("error_description")
                    .cloned()
                    .unwrap_or_else(|| code.clone());
                return Err(
                    match AuthErrorKind::classify(Some(code), &description, None) {
                        AuthErrorKind::OtpExpired => LinkError::Expired,
                        _ => LinkError::Invalid(description),
                    },
                );
            }
        }

        if let (Some(access_token), Some(refresh_token)) = (
            fragment_pairs.get("access_token"),
            fragment_pairs.get("refresh_token"),
        ) {
            return Ok(Self::Tokens {
                access_token: access_token.clone(),
                refresh_token: refresh_token.clone(),
            });
        }

        match query_pairs.get("token_hash") {
            Some(token_hash)
                if !token_hash.is_empty()
                    && query_pairs.get("type").map(String::as_str) != Some("signup") =>
            {
                Ok(Self::TokenHash(token_hash.clone()))
            }
            _ => Err(LinkError::Missing),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetStatus {
    Verifying,
    Ready,
    Invalid(String),
    Expired(String),
    Updated,
}

impl ResetStatus {
    pub fn from_link_error(err: &LinkError) -> Self {
        match err {
            LinkError::Expired => Self::Expired(
                "This password reset link has expired. Please request a new one.".to_string(),
            ),
            LinkError::Missing => {
                Self::Invalid("This password reset link is invalid or has expired.".to_string())
            }
            LinkError::Invalid(message) => Self::Invalid(message.clone()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Verifying => "Verifying reset link...",
            Self::Ready => "Enter your new password below.",
            Self::Invalid(message) | Self::Expired(message) => message,
            Self::Updated => "Password updated successfully! Redirecting to dashboard...",
        }
    }

    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn needs_new_link(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::Expired(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_link_requires_token_and_email_type() {
        let link = ConfirmLink::parse("?token_hash=abc123456789&type=email&next=%2Fprofile")
            .unwrap();
        assert_eq!(link.kind, OtpKind::Email);
        assert_eq!(link.next, "/profile");
        assert_eq!(link.token_hint(), "abc12345...");

        let (err, email) =
            ConfirmLink::parse("type=recovery&token_hash=x&email=a%40b.co").unwrap_err();
        assert_eq!(err, LinkError::Missing);
        assert_eq!(email.as_deref(), Some("a@b.co"));
    }

    #[test]
    fn confirm_link_rejects_offsite_next() {
        let link = ConfirmLink::parse("token_hash=abc&type=signup&next=https://evil.example")
            .unwrap();
        assert_eq!(link.next, "/dashboard");

        let encoded_tab =
            ConfirmLink::parse("token_hash=abc&type=signup&next=%2F%09%2Fevil.example").unwrap();
        assert_eq!(encoded_tab.next, "/dashboard");
    }

    #[test]
    fn recovery_link_prefers_fragment_tokens() {
        let link = RecoveryLink::parse("", "#access_token=a&refresh_token=r&type=recovery")
            .unwrap();
        assert_eq!(
            link,
            RecoveryLink::Tokens {
                access_token: "a".to_string(),
                refresh_token: "r".to_string(),
            }
        );

        let hashed = RecoveryLink::parse("?token_hash=h&type=recovery", "").unwrap();
        assert_eq!(hashed, RecoveryLink::TokenHash("h".to_string()));
    }

    #[test]
    fn recovery_link_reports_errors() {
        let expired = RecoveryLink::parse(
            "",
            "#error=access_denied&error_code=otp_expired&error_description=Email+link+is+invalid+or+has+expired",
        );
        assert_eq!(expired, Err(LinkError::Expired));
        assert_eq!(RecoveryLink::parse("", ""), Err(LinkError::Missing));
        assert!(format!("{:?}", RecoveryLink::TokenHash("secret".into())).find("secret").is_none());
    }

    #[test]
    fn statuses_expose_copy() {
        assert!(VerificationStatus::Expired.offers_resend());
        assert!(!VerificationStatus::Verified.offers_resend());
        assert_eq!(
            VerificationStatus::from_error(&AuthError::new("Token has expired or is invalid")),
            VerificationStatus::Expired
        );
        assert!(ResetStatus::from_link_error(&LinkError::Missing).needs_new_link());
        assert!(ResetStatus::Ready.accepts_input());
    }
}
