//! Status banners shown above page content.

use crate::{
    app_lib::telemetry, components::use_toasts, features::auth::use_auth,
    features::network::use_network_status,
};
use auth_state::{
    AuthClient,
    client::ResendRequest,
    log::ErrorContext,
    notice::{resend_failure, resend_success},
    routes::paths,
};
use leptos::prelude::*;
use serde_json::{Map, json};

/// Reminds signed-in users with an unconfirmed email to verify it.
#[component]
pub fn EmailVerificationBanner() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let (dismissed, set_dismissed) = signal(false);

    let pending_email = move || {
        auth.user
            .get()
            .filter(|user| !user.is_email_confirmed())
            .and_then(|user| user.email.clone().map(|email| (user.id, email)))
    };

    let resend = Action::new_local(move |(user_id, email): &(String, String)| {
        let user_id = user_id.clone();
        let email = email.clone();
        async move {
            let Some(client) = auth.client() else {
                return;
            };
            let mut data = Map::new();
            data.insert("userId".into(), json!(user_id));
            telemetry::log_user_action("Resend verification email attempted", data);

            let redirect = client.config().site_link(paths::CONFIRM);
            match client.resend(&ResendRequest::signup(email, Some(redirect))).await {
                Ok(()) => toasts.push(resend_success()),
                Err(err) => {
                    telemetry::log_error(
                        err.message(),
                        ErrorContext::component("EmailVerificationBanner", "resend_verification")
                            .with_user(user_id),
                    );
                    toasts.push(resend_failure(&err));
                }
            }
        }
    });

    move || {
        if dismissed.get() {
            return None;
        }
        let (user_id, email) = pending_email()?;
        let target = (user_id, email.clone());
        Some(view! {
            <div class="bg-yellow-50 border-l-4 border-yellow-400 p-4">
                <div class="max-w-screen-xl mx-auto flex justify-between items-start gap-4">
                    <div>
                        <p class="text-sm text-yellow-700">
                            <strong>"Please verify your email address."</strong>
                            " We've sent a verification link to "
                            <span class="font-medium">{email}</span>
                            ". Check your inbox and click the link to activate your account."
                        </p>
                        <button
                            type="button"
                            class="mt-2 text-sm bg-yellow-100 text-yellow-800 hover:bg-yellow-200 px-3 py-1 rounded font-medium disabled:opacity-50"
                            disabled=move || resend.pending().get()
                            on:click=move |_| {
                                resend.dispatch(target.clone());
                            }
                        >
                            {move || if resend.pending().get() { "Sending..." } else { "Resend Email" }}
                        </button>
                    </div>
                    <button
                        type="button"
                        class="text-yellow-400 hover:text-yellow-600"
                        aria-label="Dismiss"
                        on:click=move |_| set_dismissed.set(true)
                    >
                        "×"
                    </button>
                </div>
            </div>
        })
    }
}

/// Connectivity banner: a warning while offline and a notice after reconnecting.
#[component]
pub fn OfflineBanner() -> impl IntoView {
    let status = use_network_status();

    move || {
        let status = status.get();
        if status.show_offline_banner() {
            Some(
                view! {
                    <div class="bg-red-600 px-4 py-2 text-center text-sm text-white" role="status">
                        "You're offline. Some features may not work until your connection returns."
                    </div>
                }
                .into_any(),
            )
        } else if status.show_reconnected_banner() {
            Some(
                view! {
                    <div class="bg-emerald-600 px-4 py-2 text-center text-sm text-white" role="status">
                        "Back online."
                    </div>
                }
                .into_any(),
            )
        } else {
            None
        }
    }
}
