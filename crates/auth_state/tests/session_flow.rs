use auth_state::{
    AuthChangeEvent, AuthClient, AuthError, AuthEventBus, AuthSnapshot, PasswordCredentials,
    Session, SessionController, SignUpOutcome, Subscription, User, UserAttributes,
    client::{OtpKind, ResendRequest, SignUpRequest, VerifyOtpRequest},
    guard::{GuardView, RedirectLatch, evaluate},
    routes::{Access, access_for},
};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

fn user() -> User {
    User {
        id: "user-1".to_string(),
        email: Some("test@example.com".to_string()),
        email_confirmed_at: Some("2024-01-01T00:00:00Z".to_string()),
        ..User::default()
    }
}

fn session() -> Session {
    Session {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_in: 3600,
        expires_at: None,
        token_type: "bearer".to_string(),
        user: user(),
    }
}

/// In-memory provider. `sign_out` does not emit; tests emit explicitly to
/// control when the event arrives.
#[derive(Default)]
struct FakeClient {
    bus: AuthEventBus,
    initial: RefCell<Option<Result<Option<Session>, AuthError>>>,
    event_during_fetch: RefCell<Option<(AuthChangeEvent, Option<Session>)>>,
    sign_out_calls: Cell<u32>,
    sign_out_error: RefCell<Option<AuthError>>,
}

impl FakeClient {
    fn with_initial(initial: Result<Option<Session>, AuthError>) -> Rc<Self> {
        let client = Self::default();
        *client.initial.borrow_mut() = Some(initial);
        Rc::new(client)
    }
}

impl AuthClient for FakeClient {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        if let Some((event, session)) = self.event_during_fetch.borrow_mut().take() {
            self.bus.emit(event, session.as_ref());
        }
        self.initial.borrow_mut().take().unwrap_or(Ok(None))
    }

    fn on_auth_state_change(
        &self,
        listener: impl Fn(AuthChangeEvent, Option<&Session>) + 'static,
    ) -> Subscription {
        self.bus.subscribe(listener)
    }

    async fn sign_in_with_password(
        &self,
        _credentials: &PasswordCredentials,
    ) -> Result<Session, AuthError> {
        let session = session();
        self.bus.emit(AuthChangeEvent::SignedIn, Some(&session));
        Ok(session)
    }

    async fn sign_up(&self, _request: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        Ok(SignUpOutcome::ConfirmationRequired(user()))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.set(self.sign_out_calls.get() + 1);
        match self.sign_out_error.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn resend(&self, _request: &ResendRequest) -> Result<(), AuthError> {
        Ok(())
    }

    async fn reset_password_for_email(
        &self,
        _email: &str,
        _redirect_to: Option<&str>,
    ) -> Result<(), AuthError> {
        Ok(())
    }

    async fn update_user(&self, _attributes: &UserAttributes) -> Result<User, AuthError> {
        Ok(user())
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<Option<Session>, AuthError> {
        let session = session();
        self.bus.emit(request.kind.event(), Some(&session));
        Ok(Some(session))
    }

    async fn set_session_from_tokens(
        &self,
        _access_token: &str,
        _refresh_token: &str,
    ) -> Result<Session, AuthError> {
        Ok(session())
    }
}

/// Records every snapshot the controller publishes.
fn recording_controller(
    client: &Rc<FakeClient>,
) -> (SessionController<FakeClient>, Rc<RefCell<Vec<AuthSnapshot>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let controller = SessionController::new(Rc::clone(client), move |snapshot: &AuthSnapshot| {
        sink.borrow_mut().push(snapshot.clone());
    });
    (controller, seen)
}

/// Mirrors what the protected route component does on each snapshot.
struct GuardHarness {
    latch: RedirectLatch,
    redirects: Vec<String>,
    rendered_children: bool,
}

impl GuardHarness {
    fn new() -> Self {
        Self {
            latch: RedirectLatch::new(),
            redirects: Vec::new(),
            rendered_children: false,
        }
    }

    fn render(&mut self, access: Access, snapshot: &AuthSnapshot, path: &str) -> GuardView {
        let outcome = evaluate(access, snapshot, path, None);
        if let Some(target) = self.latch.observe(&outcome) {
            self.redirects.push(target);
        }
        if outcome.renders_children() {
            self.rendered_children = true;
        }
        outcome.view
    }
}

#[tokio::test]
async fn mount_resolves_loading_once() {
    let client = FakeClient::with_initial(Ok(Some(session())));
    let (controller, seen) = recording_controller(&client);

    assert!(controller.snapshot().is_loading());
    controller.mount().await;

    assert!(!controller.snapshot().is_loading());
    assert_eq!(
        controller.snapshot().user().map(|user| user.id.as_str()),
        Some("user-1")
    );
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(client.bus.listener_count(), 1);
}

#[tokio::test]
async fn failed_initial_fetch_is_unauthenticated() {
    let client = FakeClient::with_initial(Err(AuthError::network("offline")));
    let (controller, _) = recording_controller(&client);
    controller.mount().await;

    let snapshot = controller.snapshot();
    assert!(!snapshot.is_loading());
    assert!(!snapshot.is_authenticated());
}

#[tokio::test]
async fn event_during_fetch_is_kept_when_fetch_fails() {
    let client = FakeClient::with_initial(Err(AuthError::network("offline")));
    *client.event_during_fetch.borrow_mut() = Some((AuthChangeEvent::SignedIn, Some(session())));
    let (controller, _) = recording_controller(&client);
    controller.mount().await;

    assert!(controller.snapshot().is_authenticated());
    assert_eq!(controller.snapshot().last_event(), Some(AuthChangeEvent::SignedIn));
}

#[tokio::test]
async fn sign_out_clears_user_only_after_the_event() {
    let client = FakeClient::with_initial(Ok(Some(session())));
    let (controller, seen) = recording_controller(&client);
    controller.mount().await;

    controller.sign_out().await.unwrap();
    assert_eq!(client.sign_out_calls.get(), 1);
    assert!(controller.snapshot().is_authenticated());
    assert!(seen.borrow().iter().any(AuthSnapshot::is_signing_out));

    client.bus.emit(AuthChangeEvent::SignedOut, None);
    let snapshot = controller.snapshot();
    assert!(snapshot.user().is_none());
    assert!(!snapshot.is_loading());
}

#[tokio::test]
async fn sign_out_errors_are_returned_and_loading_cleared() {
    let client = FakeClient::with_initial(Ok(Some(session())));
    *client.sign_out_error.borrow_mut() = Some(AuthError::network("offline"));
    let (controller, _) = recording_controller(&client);
    controller.mount().await;

    let err = controller.sign_out().await.unwrap_err();
    assert_eq!(err.message(), "offline");
    assert!(!controller.snapshot().is_loading());
    assert!(controller.snapshot().is_authenticated());
}

#[tokio::test]
async fn unmount_unsubscribes() {
    let client = FakeClient::with_initial(Ok(None));
    let (controller, seen) = recording_controller(&client);
    controller.mount().await;
    controller.unmount();
    assert_eq!(client.bus.listener_count(), 0);

    let before = seen.borrow().len();
    client.bus.emit(AuthChangeEvent::SignedIn, Some(&session()));
    assert_eq!(seen.borrow().len(), before);
    assert!(!controller.snapshot().is_authenticated());
}

#[tokio::test]
async fn provider_events_flow_into_the_snapshot() {
    let client = FakeClient::with_initial(Ok(None));
    let (controller, _) = recording_controller(&client);
    controller.mount().await;

    let credentials = PasswordCredentials {
        email: "test@example.com".to_string(),
        password: "password123".to_string(),
    };
    client.sign_in_with_password(&credentials).await.unwrap();
    assert!(controller.snapshot().is_authenticated());

    let request = VerifyOtpRequest {
        token_hash: "hash".to_string(),
        kind: OtpKind::Recovery,
    };
    client.verify_otp(&request).await.unwrap();
    assert_eq!(
        controller.snapshot().last_event(),
        Some(AuthChangeEvent::PasswordRecovery)
    );
}

#[test]
fn protected_guard_never_renders_without_a_session() {
    let mut guard = GuardHarness::new();
    for snapshot in [AuthSnapshot::loading(), AuthSnapshot::unauthenticated()] {
        assert_eq!(guard.render(Access::Protected, &snapshot, "/dashboard"), GuardView::Spinner);
    }
    assert!(!guard.rendered_children);
}

#[test]
fn protected_guard_renders_users_without_redirecting() {
    let mut guard = GuardHarness::new();
    let snapshot = AuthSnapshot::authenticated(session());
    assert_eq!(guard.render(Access::Protected, &snapshot, "/dashboard"), GuardView::Children);
    assert!(guard.redirects.is_empty());
}

#[test]
fn auth_only_guard_hides_children_from_users() {
    let mut guard = GuardHarness::new();
    let snapshot = AuthSnapshot::authenticated(session());
    assert_eq!(guard.render(Access::AuthOnly, &snapshot, "/login"), GuardView::Spinner);
    assert!(!guard.rendered_children);
    assert_eq!(guard.redirects, ["/dashboard"]);
}

#[tokio::test]
async fn resolving_without_a_user_redirects_exactly_once() {
    let client = FakeClient::with_initial(Ok(None));
    let (controller, seen) = recording_controller(&client);
    let mut guard = GuardHarness::new();

    guard.render(Access::Protected, &controller.snapshot(), "/profile");
    controller.mount().await;
    for snapshot in seen.borrow().iter() {
        guard.render(Access::Protected, snapshot, "/profile");
    }
    // Effect re-runs with the same decision.
    guard.render(Access::Protected, &controller.snapshot(), "/profile");

    assert_eq!(guard.redirects, ["/login?redirectTo=%2Fprofile"]);
    assert!(!guard.rendered_children);
}

#[tokio::test]
async fn protected_route_scenario() {
    let client = FakeClient::with_initial(Ok(None));
    let (controller, _) = recording_controller(&client);
    let mut guard = GuardHarness::new();
    let path = "/dashboard";
    assert_eq!(access_for(path), Access::Protected);

    assert_eq!(guard.render(Access::Protected, &controller.snapshot(), path), GuardView::Spinner);
    assert!(!guard.rendered_children);

    controller.mount().await;
    assert_eq!(guard.render(Access::Protected, &controller.snapshot(), path), GuardView::Spinner);
    assert!(!guard.rendered_children);
    assert_eq!(guard.redirects.len(), 1);

    client.bus.emit(AuthChangeEvent::SignedIn, Some(&session()));
    assert_eq!(guard.render(Access::Protected, &controller.snapshot(), path), GuardView::Children);
    assert_eq!(guard.redirects.len(), 1);
}
