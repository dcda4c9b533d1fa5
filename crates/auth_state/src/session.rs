//! Session model and the reducer that owns every auth state transition.
//!
//! Flow Overview: the controller subscribes to the provider's event stream,
//! then fetches the persisted session once. Both paths feed
//! [`SessionStore::apply`], which produces a fresh [`AuthSnapshot`]; listeners
//! (the UI provider) only see whole snapshots, never partial updates. Token
//! material must never reach logs, so `Session` redacts it from `Debug`.

use crate::{client::AuthClient, error::AuthError, events::AuthChangeEvent, events::Subscription};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{cell::RefCell, fmt, rc::Rc, sync::Arc};
use tracing::{debug, warn};

/// Refresh sessions this many seconds before they actually expire.
pub const REFRESH_MARGIN_SECS: i64 = 30;

/// Account record as returned by the auth API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

impl User {
    pub fn is_email_confirmed(&self) -> bool {
        self.email_confirmed_at
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    /// Reads a string entry from the metadata object.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.user_metadata.get(key).and_then(Value::as_str)
    }

    /// Name from metadata, falling back to the local part of the email.
    pub fn display_name(&self) -> String {
        match self.metadata_str("name").map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.email().split('@').next().unwrap_or_default().to_string(),
        }
    }

    /// Truncated identifier for display, e.g. `1a2b3c4d...`.
    pub fn short_id(&self) -> String {
        if self.id.chars().count() <= 8 {
            return self.id.clone();
        }
        let prefix: String = self.id.chars().take(8).collect();
        format!("{prefix}...")
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

impl Session {
    /// Fills `expires_at` from `expires_in` when the API omitted it.
    #[must_use]
    pub fn stamp_expiry(mut self, now_secs: i64) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now_secs + self.expires_in);
        }
        self
    }

    pub fn needs_refresh(&self, now_secs: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at - REFRESH_MARGIN_SECS <= now_secs)
    }

    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.user = user;
        self
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .field("token_type", &self.token_type)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Loading,
    Unauthenticated,
    Authenticated(Arc<Session>),
}

impl SessionState {
    fn from_session(session: Option<Session>) -> Self {
        match session {
            Some(session) => Self::Authenticated(Arc::new(session)),
            None => Self::Unauthenticated,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Immutable view of auth state handed to the UI.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthSnapshot {
    state: SessionState,
    signing_out: bool,
    last_event: Option<AuthChangeEvent>,
}

impl AuthSnapshot {
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn unauthenticated() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            ..Self::default()
        }
    }

    pub fn authenticated(session: Session) -> Self {
        Self {
            state: SessionState::Authenticated(Arc::new(session)),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.session()
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|session| &session.user)
    }

    /// True until the first resolution and while a sign-out call is pending.
    pub fn is_loading(&self) -> bool {
        self.signing_out || matches!(self.state, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn is_signing_out(&self) -> bool {
        self.signing_out
    }

    pub fn last_event(&self) -> Option<AuthChangeEvent> {
        self.last_event
    }
}

#[derive(Debug)]
pub enum SessionAction {
    InitialSessionResolved(Result<Option<Session>, AuthError>),
    AuthStateChanged {
        event: AuthChangeEvent,
        session: Option<Session>,
    },
    SignOutStarted,
    SignOutFinished,
}

/// Owner of the current snapshot; the only place transitions happen.
#[derive(Debug, Default)]
pub struct SessionStore {
    snapshot: AuthSnapshot,
    initial_resolved: bool,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &AuthSnapshot {
        &self.snapshot
    }

    /// Applies an action and reports whether the snapshot changed.
    pub fn apply(&mut self, action: SessionAction) -> bool {
        let mut next = self.snapshot.clone();

        match action {
            SessionAction::InitialSessionResolved(result) => {
                if self.initial_resolved {
                    debug!("ignoring repeated initial session resolution");
                    return false;
                }
                self.initial_resolved = true;
                match result {
                    Ok(session) => next.state = SessionState::from_session(session),
                    Err(err) => {
                        warn!(kind = ?err.kind(), error = %err, "initial session fetch failed");
                        if matches!(next.state, SessionState::Loading) {
                            next.state = SessionState::Unauthenticated;
                        }
                    }
                }
            }
            SessionAction::AuthStateChanged { event, session } => {
                debug!(event = %event, has_session = session.is_some(), "auth state changed");
                next.state = SessionState::from_session(session);
                next.last_event = Some(event);
                if event == AuthChangeEvent::SignedOut {
                    next.signing_out = false;
                }
            }
            SessionAction::SignOutStarted => next.signing_out = true,
            SessionAction::SignOutFinished => next.signing_out = false,
        }

        if next == self.snapshot {
            false
        } else {
            self.snapshot = next;
            true
        }
    }
}

type SnapshotListener = Rc<dyn Fn(&AuthSnapshot)>;

/// Binds a [`SessionStore`] to a provider client for the lifetime of the app.
pub struct SessionController<C> {
    client: Rc<C>,
    store: Rc<RefCell<SessionStore>>,
    listener: SnapshotListener,
    subscription: RefCell<Option<Subscription>>,
}

impl<C: AuthClient + 'static> SessionController<C> {
    pub fn new(client: Rc<C>, listener: impl Fn(&AuthSnapshot) + 'static) -> Self {
        Self {
            client,
            store: Rc::new(RefCell::new(SessionStore::new())),
            listener: Rc::new(listener),
            subscription: RefCell::new(None),
        }
    }

    pub fn client(&self) -> &Rc<C> {
        &self.client
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.store.borrow().snapshot().clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    /// Subscribes to auth events, then resolves the initial session.
    pub async fn mount(&self) {
        self.subscribe();
        let initial = self.client.get_session().await;
        dispatch(
            &self.store,
            &self.listener,
            SessionAction::InitialSessionResolved(initial),
        );
    }

    fn subscribe(&self) {
        if self.is_mounted() {
            return;
        }
        let store = Rc::clone(&self.store);
        let listener = Rc::clone(&self.listener);
        let subscription = self.client.on_auth_state_change(move |event, session| {
            dispatch(
                &store,
                &listener,
                SessionAction::AuthStateChanged {
                    event,
                    session: session.cloned(),
                },
            );
        });
        *self.subscription.borrow_mut() = Some(subscription);
    }

    /// Signs out through the provider. The user is cleared by the
    /// `SIGNED_OUT` event, not here.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        dispatch(&self.store, &self.listener, SessionAction::SignOutStarted);
        let result = self.client.sign_out().await;
        if let Err(err) = &result {
            warn!(kind = ?err.kind(), error = %err, "sign out failed");
        }
        dispatch(&self.store, &self.listener, SessionAction::SignOutFinished);
        result
    }

    pub fn unmount(&self) {
        if self.subscription.borrow_mut().take().is_some() {
            debug!("auth event subscription released");
        }
    }
}

fn dispatch(store: &RefCell<SessionStore>, listener: &SnapshotListener, action: SessionAction) {
    let changed = {
        let mut store = store.borrow_mut();
        store.apply(action).then(|| store.snapshot().clone())
    };
    if let Some(snapshot) = changed {
        listener(&snapshot);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_user() -> User {
        User {
            id: "0f8fad5b-d9cb-469f-a165-70867728950e".to_string(),
            email: Some("test@example.com".to_string()),
            email_confirmed_at: Some("2024-01-01T00:00:00.000Z".to_string()),
            created_at: Some("2024-01-01T00:00:00.000Z".to_string()),
            last_sign_in_at: None,
            user_metadata: json!({ "name": "Test User" })
                .as_object()
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub(crate) fn sample_session() -> Session {
        Session {
            access_token: "mock-access-token".to_string(),
            refresh_token: "mock-refresh-token".to_string(),
            expires_in: 3600,
            expires_at: None,
            token_type: "bearer".to_string(),
            user: sample_user(),
        }
    }

    #[test]
    fn starts_loading() {
        let store = SessionStore::new();
        assert!(store.snapshot().is_loading());
        assert!(store.snapshot().user().is_none());
    }

    #[test]
    fn initial_fetch_leaves_loading_exactly_once() {
        let mut store = SessionStore::new();
        assert!(store.apply(SessionAction::InitialSessionResolved(Ok(None))));
        assert_eq!(store.snapshot().state(), &SessionState::Unauthenticated);

        let repeated = SessionAction::InitialSessionResolved(Ok(Some(sample_session())));
        assert!(!store.apply(repeated));
        assert!(!store.snapshot().is_authenticated());
    }

    #[test]
    fn failed_initial_fetch_resolves_to_unauthenticated() {
        let mut store = SessionStore::new();
        store.apply(SessionAction::InitialSessionResolved(Err(AuthError::network(
            "offline",
        ))));
        assert!(!store.snapshot().is_loading());
        assert!(!store.snapshot().is_authenticated());
    }

    #[test]
    fn failed_initial_fetch_keeps_state_set_by_an_earlier_event() {
        let mut store = SessionStore::new();
        store.apply(SessionAction::AuthStateChanged {
            event: AuthChangeEvent::SignedIn,
            session: Some(sample_session()),
        });
        store.apply(SessionAction::InitialSessionResolved(Err(AuthError::network(
            "offline",
        ))));
        assert!(store.snapshot().is_authenticated());
    }

    #[test]
    fn events_overwrite_the_session_and_stop_loading() {
        let mut store = SessionStore::new();
        store.apply(SessionAction::AuthStateChanged {
            event: AuthChangeEvent::SignedIn,
            session: Some(sample_session()),
        });
        let snapshot = store.snapshot();
        assert!(!snapshot.is_loading());
        assert_eq!(snapshot.user().map(User::email), Some("test@example.com"));
        assert_eq!(snapshot.last_event(), Some(AuthChangeEvent::SignedIn));
    }

    #[test]
    fn sign_out_flags_loading_without_clearing_the_user() {
        let mut store = SessionStore::new();
        store.apply(SessionAction::InitialSessionResolved(Ok(Some(
            sample_session(),
        ))));
        store.apply(SessionAction::SignOutStarted);
        assert!(store.snapshot().is_loading());
        assert!(store.snapshot().is_authenticated());

        store.apply(SessionAction::SignOutFinished);
        assert!(!store.snapshot().is_loading());
        assert!(store.snapshot().is_authenticated());

        store.apply(SessionAction::AuthStateChanged {
            event: AuthChangeEvent::SignedOut,
            session: None,
        });
        assert!(!store.snapshot().is_authenticated());
    }

    #[test]
    fn identical_updates_report_no_change() {
        let mut store = SessionStore::new();
        store.apply(SessionAction::InitialSessionResolved(Ok(None)));
        assert!(!store.apply(SessionAction::SignOutFinished));
    }

    #[test]
    fn expiry_is_stamped_and_checked_with_margin() {
        let session = sample_session().stamp_expiry(1_000);
        assert_eq!(session.expires_at, Some(4_600));
        assert!(!session.needs_refresh(4_500));
        assert!(session.needs_refresh(4_570));
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let rendered = format!("{:?}", sample_session());
        assert!(!rendered.contains("mock-access-token"));
        assert!(!rendered.contains("mock-refresh-token"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn user_display_helpers() {
        let mut user = sample_user();
        assert_eq!(user.display_name(), "Test User");
        assert_eq!(user.short_id(), "0f8fad5b...");
        user.user_metadata.clear();
        assert_eq!(user.display_name(), "test");
        user.email_confirmed_at = None;
        assert!(!user.is_email_confirmed());
    }

    #[test]
    fn session_parses_provider_payload() {
        let payload = json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "expires_at": 1_700_000_000,
            "token_type": "bearer",
            "user": { "id": "u1", "email": "a@b.co", "aud": "authenticated" }
        });
        let session: Session = serde_json::from_value(payload).unwrap();
        assert_eq!(session.user.id, "u1");
        assert_eq!(session.expires_at, Some(1_700_000_000));
        assert!(session.user.user_metadata.is_empty());
    }
}
