//! Auth session context for the frontend. The provider owns the session
//! controller for the lifetime of the app, mirrors every snapshot it publishes
//! into a signal, and exposes derived auth signals for guards and routes.
//! Tokens stay inside the client; only the snapshot reaches views.

use crate::{app_lib::AppConfig, features::auth::client::SupabaseClient};
use auth_state::{AuthClient, AuthError, AuthSnapshot, SessionController, User};
use gloo_timers::callback::Interval;
use leptos::{prelude::*, task::spawn_local};
use std::rc::Rc;
use tracing::debug;

/// How often the provider checks whether the session needs a refresh.
const REFRESH_CHECK_MS: u32 = 60_000;

type Controller = SessionController<SupabaseClient>;

#[derive(Clone, Copy)]
/// Auth session context shared through Leptos.
pub struct AuthContext {
    pub snapshot: RwSignal<AuthSnapshot>,
    pub user: Signal<Option<User>>,
    pub is_loading: Signal<bool>,
    pub is_authenticated: Signal<bool>,
    controller: StoredValue<Option<Rc<Controller>>, LocalStorage>,
}

impl AuthContext {
    /// Builds a context around the provided snapshot signal.
    fn new(
        snapshot: RwSignal<AuthSnapshot>,
        controller: StoredValue<Option<Rc<Controller>>, LocalStorage>,
    ) -> Self {
        Self {
            snapshot,
            user: Signal::derive(move || snapshot.with(|snapshot| snapshot.user().cloned())),
            is_loading: Signal::derive(move || snapshot.with(AuthSnapshot::is_loading)),
            is_authenticated: Signal::derive(move || {
                snapshot.with(AuthSnapshot::is_authenticated)
            }),
            controller,
        }
    }

    /// Provider client for auth calls made by pages.
    pub fn client(&self) -> Option<Rc<SupabaseClient>> {
        self.controller.with_value(|controller| {
            controller
                .as_ref()
                .map(|controller| Rc::clone(controller.client()))
        })
    }

    /// Signs out through the provider. The user disappears once the
    /// `SIGNED_OUT` event arrives.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(controller) = self.controller.get_value() else {
            return Ok(());
        };
        controller.sign_out().await
    }
}

/// Provides auth context, subscribes to auth events, and resolves the
/// persisted session once on mount.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let snapshot = RwSignal::new(AuthSnapshot::loading());
    let client = Rc::new(SupabaseClient::new(AppConfig::load()));
    let controller = Rc::new(SessionController::new(client, move |next: &AuthSnapshot| {
        snapshot.set(next.clone());
    }));
    let stored = StoredValue::new_local(Some(Rc::clone(&controller)));
    provide_context(AuthContext::new(snapshot, stored));

    spawn_local({
        let controller = Rc::clone(&controller);
        async move { controller.mount().await }
    });

    let refresh = Interval::new(REFRESH_CHECK_MS, move || {
        let Some(controller) = stored.try_get_value().flatten() else {
            return;
        };
        if controller.snapshot().is_authenticated() {
            spawn_local(async move {
                // A failed refresh already signed the user out through the event bus.
                if let Err(err) = controller.client().get_session().await {
                    debug!(kind = ?err.kind(), "periodic session refresh failed");
                }
            });
        }
    });
    let refresh = StoredValue::new_local(Some(refresh));

    on_cleanup(move || {
        refresh.try_update_value(|interval| drop(interval.take()));
        stored.try_update_value(|controller| {
            if let Some(controller) = controller.take() {
                controller.unmount();
            }
        });
    });

    view! { {children()} }
}

/// Returns the current auth context or a fallback context that never
/// leaves the loading state.
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(|| {
        AuthContext::new(
            RwSignal::new(AuthSnapshot::loading()),
            StoredValue::new_local(None),
        )
    })
}
