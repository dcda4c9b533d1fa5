//! Persisted session bookkeeping shared by provider clients: what to do with
//! the stored session before a call, after a refresh, and after sign-out.
//! Network I/O stays in the client; every storage write and emitted event
//! goes through [`SessionKeeper`].

use crate::{
    error::AuthError,
    events::{AuthChangeEvent, AuthEventBus},
    session::{Session, User},
};
use std::cell::RefCell;
use tracing::{debug, info, warn};

/// Where the current session is kept between page loads.
pub trait SessionStorage {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn remove(&self);
}

/// Storage that lives as long as the value. Used natively and in tests.
#[derive(Default)]
pub struct MemoryStorage {
    slot: RefCell<Option<Session>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Option<Session> {
        self.slot.borrow().clone()
    }

    fn save(&self, session: &Session) {
        *self.slot.borrow_mut() = Some(session.clone());
    }

    fn remove(&self) {
        self.slot.borrow_mut().take();
    }
}

/// State of the stored session at a given instant.
#[derive(Debug, PartialEq)]
pub enum Stored {
    Empty,
    Fresh(Session),
    /// Expires within the refresh margin; refresh with this token.
    Stale(Session),
}

/// Whether a failed server sign-out should still end the local session.
/// 401, 403 and 404 mean the server no longer knows the session.
pub fn sign_out_clears_locally(status: Option<u16>) -> bool {
    matches!(status, Some(401 | 403 | 404))
}

pub struct SessionKeeper<S> {
    storage: S,
    bus: AuthEventBus,
}

impl<S: SessionStorage> SessionKeeper<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            bus: AuthEventBus::new(),
        }
    }

    pub fn bus(&self) -> &AuthEventBus {
        &self.bus
    }

    pub fn current(&self, now_secs: i64) -> Stored {
        match self.storage.load() {
            None => Stored::Empty,
            Some(session) if session.needs_refresh(now_secs) => Stored::Stale(session),
            Some(session) => Stored::Fresh(session),
        }
    }

    /// Stores a fresh session and announces it.
    pub fn install(&self, session: Session, event: AuthChangeEvent, now_secs: i64) -> Session {
        let session = session.stamp_expiry(now_secs);
        self.storage.save(&session);
        self.bus.emit(event, Some(&session));
        session
    }

    pub fn update_user(&self, session: Session, user: User) -> Session {
        let session = session.with_user(user);
        self.storage.save(&session);
        self.bus.emit(AuthChangeEvent::UserUpdated, Some(&session));
        session
    }

    pub fn clear(&self) {
        self.storage.remove();
        self.bus.emit(AuthChangeEvent::SignedOut, None);
    }

    /// Applies the outcome of a refresh-token grant. A failed refresh ends
    /// the session so guards send the visitor back to login.
    pub fn settle_refresh(
        &self,
        result: Result<Session, AuthError>,
        now_secs: i64,
    ) -> Result<Session, AuthError> {
        match result {
            Ok(session) => {
                debug!("session refreshed");
                Ok(self.install(session, AuthChangeEvent::TokenRefreshed, now_secs))
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "session refresh failed, clearing stored session");
                self.clear();
                Err(err)
            }
        }
    }

    /// Applies the outcome of the server-side logout call.
    pub fn settle_sign_out(&self, result: Result<(), AuthError>) -> Result<(), AuthError> {
        match result {
            Err(err) if !sign_out_clears_locally(err.status()) => Err(err),
            _ => {
                info!("signed out");
                self.clear();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Subscription;
    use crate::session::tests::{sample_session, sample_user};
    use std::rc::Rc;

    type Recorded = Rc<RefCell<Vec<AuthChangeEvent>>>;

    const NOW: i64 = 1_700_000_000;

    fn recording(keeper: &SessionKeeper<MemoryStorage>) -> (Recorded, Subscription) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let subscription = keeper
            .bus()
            .subscribe(move |event, _| sink.borrow_mut().push(event));
        (events, subscription)
    }

    #[test]
    fn classifies_stored_session_by_expiry() {
        let keeper = SessionKeeper::new(MemoryStorage::new());
        assert_eq!(keeper.current(NOW), Stored::Empty);

        keeper.install(sample_session(), AuthChangeEvent::SignedIn, NOW);
        assert!(matches!(keeper.current(NOW), Stored::Fresh(_)));
        assert!(matches!(keeper.current(NOW + 3600 - 10), Stored::Stale(_)));
    }

    #[test]
    fn successful_refresh_stores_and_emits_token_refreshed() {
        let keeper = SessionKeeper::new(MemoryStorage::new());
        let (events, _subscription) = recording(&keeper);

        let mut refreshed = sample_session();
        refreshed.access_token = "next-access-token".to_string();
        let session = keeper.settle_refresh(Ok(refreshed), NOW).unwrap();

        assert_eq!(session.expires_at, Some(NOW + 3600));
        assert_eq!(*events.borrow(), [AuthChangeEvent::TokenRefreshed]);
        match keeper.current(NOW) {
            Stored::Fresh(stored) => assert_eq!(stored.access_token, "next-access-token"),
            other => panic!("expected fresh session, got {other:?}"),
        }
    }

    #[test]
    fn failed_refresh_clears_storage_and_emits_signed_out() {
        let keeper = SessionKeeper::new(MemoryStorage::new());
        keeper.install(sample_session(), AuthChangeEvent::SignedIn, NOW);
        let (events, _subscription) = recording(&keeper);

        let err = AuthError::from_response(400, r#"{"error_code":"refresh_token_not_found"}"#);
        let result = keeper.settle_refresh(Err(err), NOW);

        assert!(result.is_err());
        assert_eq!(keeper.current(NOW), Stored::Empty);
        assert_eq!(*events.borrow(), [AuthChangeEvent::SignedOut]);
    }

    #[test]
    fn stale_server_session_still_signs_out_locally() {
        for status in [401, 403, 404] {
            let keeper = SessionKeeper::new(MemoryStorage::new());
            keeper.install(sample_session(), AuthChangeEvent::SignedIn, NOW);
            let (events, _subscription) = recording(&keeper);

            let result = keeper.settle_sign_out(Err(AuthError::from_response(status, "{}")));

            assert!(result.is_ok(), "status {status}");
            assert_eq!(keeper.current(NOW), Stored::Empty);
            assert_eq!(*events.borrow(), [AuthChangeEvent::SignedOut]);
        }
    }

    #[test]
    fn other_sign_out_failures_keep_the_session() {
        let keeper = SessionKeeper::new(MemoryStorage::new());
        keeper.install(sample_session(), AuthChangeEvent::SignedIn, NOW);
        let (events, _subscription) = recording(&keeper);

        assert!(keeper.settle_sign_out(Err(AuthError::from_response(500, "{}"))).is_err());
        assert!(keeper.settle_sign_out(Err(AuthError::network("offline"))).is_err());

        assert!(matches!(keeper.current(NOW), Stored::Fresh(_)));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn sign_out_status_policy() {
        assert!(sign_out_clears_locally(Some(401)));
        assert!(sign_out_clears_locally(Some(404)));
        assert!(!sign_out_clears_locally(Some(500)));
        assert!(!sign_out_clears_locally(None));
    }

    #[test]
    fn user_update_rewrites_stored_session() {
        let keeper = SessionKeeper::new(MemoryStorage::new());
        let session = keeper.install(sample_session(), AuthChangeEvent::SignedIn, NOW);
        let (events, _subscription) = recording(&keeper);

        let mut user = sample_user();
        user.email = Some("new@example.com".to_string());
        keeper.update_user(session, user);

        match keeper.current(NOW) {
            Stored::Fresh(stored) => assert_eq!(stored.user.email(), "new@example.com"),
            other => panic!("expected fresh session, got {other:?}"),
        }
        assert_eq!(*events.borrow(), [AuthChangeEvent::UserUpdated]);
    }
}
