//! Hosted auth API client. Implements [`AuthClient`] over the GoTrue REST
//! endpoints, persists the session in local storage, and emits auth events to
//! subscribers. Tokens are attached as bearer headers and never logged.

use crate::{
    app_lib::{
        AppConfig, AppError,
        api::{Method, send_empty, send_json},
        telemetry,
    },
    features::auth::{
        storage::LocalSessionStorage,
        types::{PasswordGrant, RecoverBody, RefreshGrant, SignupBody},
    },
};
use auth_state::{
    AuthChangeEvent, AuthClient, AuthError, AuthErrorKind, PasswordCredentials, Session,
    SessionKeeper, SignUpOutcome, Subscription, User, UserAttributes,
    client::{ResendRequest, SignUpRequest, VerifyOtpRequest, storage_key},
    log::ErrorContext,
    persist::Stored,
};
use serde_json::Value;
use tracing::{info, warn};

/// Lifetime assumed for sessions installed from link tokens.
const LINK_SESSION_SECS: i64 = 3600;

pub struct SupabaseClient {
    config: AppConfig,
    keeper: SessionKeeper<LocalSessionStorage>,
}

fn now_secs() -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    let secs = (js_sys::Date::now() / 1000.0) as i64;
    secs
}

fn encode(value: &str) -> String {
    js_sys::encode_uri_component(value).into()
}

fn with_redirect(path: &str, redirect_to: Option<&str>) -> String {
    match redirect_to {
        Some(target) => format!("{path}?redirect_to={}", encode(target)),
        None => path.to_string(),
    }
}

impl SupabaseClient {
    pub fn new(config: AppConfig) -> Self {
        let storage = LocalSessionStorage::new(storage_key(&config.supabase_url));
        Self {
            config,
            keeper: SessionKeeper::new(storage),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// `apikey` plus a bearer of the access token, or the anon key.
    fn headers(&self, access_token: Option<&str>) -> Result<Vec<(&'static str, String)>, AppError> {
        let (_, anon_key) = self.config.credentials()?;
        let bearer = access_token.unwrap_or(anon_key);
        Ok(vec![
            ("apikey", anon_key.to_string()),
            ("Authorization", format!("Bearer {bearer}")),
        ])
    }

    async fn call_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        access_token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, AuthError> {
        let result = async {
            let url = self.config.auth_url(path)?;
            let headers = self.headers(access_token)?;
            send_json(method, &url, &headers, body).await
        }
        .await;
        result.map_err(|err| report(path, err))
    }

    async fn call_empty<B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        access_token: Option<&str>,
        body: Option<&B>,
    ) -> Result<(), AuthError> {
        let result = async {
            let url = self.config.auth_url(path)?;
            let headers = self.headers(access_token)?;
            send_empty(method, &url, &headers, body).await
        }
        .await;
        result.map_err(|err| report(path, err))
    }

    fn install(&self, session: Session, event: AuthChangeEvent) -> Session {
        self.keeper.install(session, event, now_secs())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let body = RefreshGrant { refresh_token };
        let result = self
            .call_json(Method::Post, "/token?grant_type=refresh_token", None, Some(&body))
            .await;
        self.keeper.settle_refresh(result, now_secs())
    }

    /// Session for calls that need a bearer, refreshed when close to expiry.
    async fn require_session(&self) -> Result<Session, AuthError> {
        self.get_session().await?.ok_or_else(|| {
            AuthError::with_kind(AuthErrorKind::SessionNotFound, "Auth session missing!")
        })
    }
}

/// Converts a transport error, recording HTTP failures in the error log.
fn report(path: &str, err: AppError) -> AuthError {
    let endpoint = path.split('?').next().unwrap_or(path);
    match &err {
        AppError::Http { status, body } => {
            telemetry::log_api_error(endpoint, *status, body, ErrorContext::default());
        }
        other => warn!(endpoint, error = %other, "auth request failed"),
    }
    AuthError::from(err)
}

impl AuthClient for SupabaseClient {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        match self.keeper.current(now_secs()) {
            Stored::Empty => Ok(None),
            Stored::Fresh(session) => Ok(Some(session)),
            Stored::Stale(session) => self.refresh(&session.refresh_token).await.map(Some),
        }
    }

    fn on_auth_state_change(
        &self,
        listener: impl Fn(AuthChangeEvent, Option<&Session>) + 'static,
    ) -> Subscription {
        self.keeper.bus().subscribe(listener)
    }

    async fn sign_in_with_password(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<Session, AuthError> {
        let body = PasswordGrant {
            email: credentials.email.trim(),
            password: &credentials.password,
        };
        let session: Session = self
            .call_json(Method::Post, "/token?grant_type=password", None, Some(&body))
            .await?;
        info!(user_id = %session.user.id, "signed in");
        Ok(self.install(session, AuthChangeEvent::SignedIn))
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        let body = SignupBody {
            email: request.credentials.email.trim(),
            password: &request.credentials.password,
            data: &request.data,
        };
        let path = with_redirect("/signup", request.email_redirect_to.as_deref());
        let response: Value = self.call_json(Method::Post, &path, None, Some(&body)).await?;
        match SignUpOutcome::from_json(response)? {
            SignUpOutcome::SignedIn(session) => Ok(SignUpOutcome::SignedIn(
                self.install(session, AuthChangeEvent::SignedIn),
            )),
            outcome => Ok(outcome),
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let session = match self.keeper.current(now_secs()) {
            Stored::Empty => {
                self.keeper.clear();
                return Ok(());
            }
            Stored::Fresh(session) | Stored::Stale(session) => session,
        };

        let result = self
            .call_empty::<()>(Method::Post, "/logout", Some(&session.access_token), None)
            .await;
        self.keeper.settle_sign_out(result)
    }

    async fn resend(&self, request: &ResendRequest) -> Result<(), AuthError> {
        let path = with_redirect("/resend", request.email_redirect_to.as_deref());
        self.call_empty(Method::Post, &path, None, Some(request)).await
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthError> {
        let path = with_redirect("/recover", redirect_to);
        let body = RecoverBody {
            email: email.trim(),
        };
        self.call_empty(Method::Post, &path, None, Some(&body)).await
    }

    async fn update_user(&self, attributes: &UserAttributes) -> Result<User, AuthError> {
        let session = self.require_session().await?;
        let user: User = self
            .call_json(
                Method::Put,
                "/user",
                Some(&session.access_token),
                Some(attributes),
            )
            .await?;
        self.keeper.update_user(session, user.clone());
        Ok(user)
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<Option<Session>, AuthError> {
        let response: Value = self
            .call_json(Method::Post, "/verify", None, Some(request))
            .await?;
        if response.get("access_token").is_none() {
            return Ok(None);
        }
        let session: Session = serde_json::from_value(response)
            .map_err(|err| AuthError::new(format!("Unexpected verify response: {err}")))?;
        Ok(Some(self.install(session, request.kind.event())))
    }

    async fn set_session_from_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<Session, AuthError> {
        let user: User = self
            .call_json::<(), _>(Method::Get, "/user", Some(access_token), None)
            .await?;
        let session = Session {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_in: LINK_SESSION_SECS,
            expires_at: None,
            token_type: "bearer".to_string(),
            user,
        };
        Ok(self.install(session, AuthChangeEvent::SignedIn))
    }
}
