//! Provider boundary. The web app implements [`AuthClient`] against the hosted
//! auth REST API; tests implement it in memory.

use crate::{
    error::AuthError,
    events::{AuthChangeEvent, Subscription},
    session::{Session, User},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

#[derive(Clone, Serialize)]
pub struct PasswordCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("PasswordCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct SignUpRequest {
    pub credentials: PasswordCredentials,
    pub data: Map<String, Value>,
    pub email_redirect_to: Option<String>,
}

/// Result of a signup call. Projects without email confirmation return a
/// session straight away.
#[derive(Clone, Debug, PartialEq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    ConfirmationRequired(User),
}

impl SignUpOutcome {
    /// Reads a signup response, which is either a session or a bare user.
    pub fn from_json(value: Value) -> Result<Self, AuthError> {
        if value.get("access_token").is_some() {
            return serde_json::from_value(value)
                .map(Self::SignedIn)
                .map_err(|err| AuthError::new(format!("Unexpected signup response: {err}")));
        }
        let user = value.get("user").cloned().unwrap_or(value);
        serde_json::from_value(user)
            .map(Self::ConfirmationRequired)
            .map_err(|err| AuthError::new(format!("Unexpected signup response: {err}")))
    }

    pub fn user(&self) -> &User {
        match self {
            Self::SignedIn(session) => &session.user,
            Self::ConfirmationRequired(user) => user,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResendKind {
    Signup,
    EmailChange,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResendRequest {
    #[serde(rename = "type")]
    pub kind: ResendKind,
    pub email: String,
    #[serde(skip)]
    pub email_redirect_to: Option<String>,
}

impl ResendRequest {
    pub fn signup(email: impl Into<String>, email_redirect_to: Option<String>) -> Self {
        Self {
            kind: ResendKind::Signup,
            email: email.into(),
            email_redirect_to,
        }
    }
}

/// One-time-token types accepted by the verify endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpKind {
    Signup,
    Email,
    Recovery,
    EmailChange,
    Invite,
    Magiclink,
}

impl OtpKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "signup" => Some(Self::Signup),
            "email" => Some(Self::Email),
            "recovery" => Some(Self::Recovery),
            "email_change" => Some(Self::EmailChange),
            "invite" => Some(Self::Invite),
            "magiclink" => Some(Self::Magiclink),
            _ => None,
        }
    }

    /// Event emitted after a successful verification of this kind.
    pub fn event(self) -> AuthChangeEvent {
        match self {
            Self::Recovery => AuthChangeEvent::PasswordRecovery,
            _ => AuthChangeEvent::SignedIn,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct VerifyOtpRequest {
    pub token_hash: String,
    #[serde(rename = "type")]
    pub kind: OtpKind,
}

/// Fields sent to the user update endpoint; `None` fields are omitted.
#[derive(Clone, Default, Serialize)]
pub struct UserAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl UserAttributes {
    pub fn password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            data: None,
        }
    }

    pub fn data(data: Map<String, Value>) -> Self {
        Self {
            password: None,
            data: Some(data),
        }
    }
}

impl std::fmt::Debug for UserAttributes {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("UserAttributes")
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("data", &self.data)
            .finish()
    }
}

/// Operations the app needs from the hosted auth provider.
#[allow(async_fn_in_trait)]
pub trait AuthClient {
    /// Current session, refreshing it when close to expiry.
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    fn on_auth_state_change(
        &self,
        listener: impl Fn(AuthChangeEvent, Option<&Session>) + 'static,
    ) -> Subscription;

    async fn sign_in_with_password(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<Session, AuthError>;

    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn resend(&self, request: &ResendRequest) -> Result<(), AuthError>;

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthError>;

    async fn update_user(&self, attributes: &UserAttributes) -> Result<User, AuthError>;

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<Option<Session>, AuthError>;

    /// Installs a session from tokens delivered in a link fragment.
    async fn set_session_from_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<Session, AuthError>;
}

/// Local storage key for the persisted session, `sb-<project-ref>-auth-token`.
pub fn storage_key(supabase_url: &str) -> String {
    let project_ref = Url::parse(supabase_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .and_then(|host| host.split('.').next().map(str::to_string))
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "local".to_string());
    format!("sb-{project_ref}-auth-token")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn storage_key_uses_project_ref() {
        assert_eq!(
            storage_key("https://abcdefgh.supabase.co"),
            "sb-abcdefgh-auth-token"
        );
        assert_eq!(storage_key("http://localhost:54321"), "sb-localhost-auth-token");
        assert_eq!(storage_key("not a url"), "sb-local-auth-token");
    }

    #[test]
    fn signup_outcome_distinguishes_session_from_user() {
        let confirm = SignUpOutcome::from_json(json!({
            "id": "u1",
            "email": "new@example.com",
            "email_confirmed_at": null
        }))
        .unwrap();
        assert!(matches!(confirm, SignUpOutcome::ConfirmationRequired(_)));
        assert_eq!(confirm.user().email(), "new@example.com");

        let signed_in = SignUpOutcome::from_json(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "user": { "id": "u1", "email": "new@example.com" }
        }))
        .unwrap();
        assert!(matches!(signed_in, SignUpOutcome::SignedIn(_)));
    }

    #[test]
    fn otp_kinds_parse_and_map_to_events() {
        assert_eq!(OtpKind::parse("signup"), Some(OtpKind::Signup));
        assert_eq!(OtpKind::parse("bogus"), None);
        assert_eq!(OtpKind::Recovery.event(), AuthChangeEvent::PasswordRecovery);
        assert_eq!(OtpKind::Email.event(), AuthChangeEvent::SignedIn);
    }

    #[test]
    fn attributes_omit_unset_fields_and_hide_passwords() {
        let body = serde_json::to_value(UserAttributes::password("hunter22")).unwrap();
        assert_eq!(body, json!({ "password": "hunter22" }));
        assert!(!format!("{:?}", UserAttributes::password("hunter22")).contains("hunter22"));

        let credentials = PasswordCredentials {
            email: "a@b.co".to_string(),
            password: "secret".to_string(),
        };
        assert!(!format!("{credentials:?}").contains("secret"));
    }

    #[test]
    fn resend_body_uses_wire_names() {
        let body = serde_json::to_value(ResendRequest::signup("a@b.co", None)).unwrap();
        assert_eq!(body, json!({ "type": "signup", "email": "a@b.co" }));
    }
}
