//! Email confirmation landing page for `/auth/confirm` links.

use crate::app_lib::telemetry;
use crate::components::layout::AppShell;
use crate::components::{Alert, AlertKind, Spinner, use_toasts};
use crate::features::auth::use_auth;
use crate::routes::form::AuthCard;
use auth_state::AuthClient;
use auth_state::client::{ResendRequest, VerifyOtpRequest};
use auth_state::flows::{CONFIRM_REDIRECT_DELAY_MS, ConfirmLink, VerificationStatus};
use auth_state::log::ErrorContext;
use auth_state::notice::{resend_failure, resend_success};
use auth_state::routes::paths;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_location, use_navigate};
use serde_json::{Map, json};
use std::time::Duration;

#[component]
pub fn ConfirmPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let navigate = use_navigate();
    let location = use_location();
    let status = RwSignal::new(VerificationStatus::Verifying);
    let resent = RwSignal::new(false);

    let link = ConfirmLink::parse(location.search.get_untracked().trim_start_matches('?'));
    let email = match &link {
        Ok(link) => link.email.clone(),
        Err((_, email)) => email.clone(),
    };

    match link {
        Ok(link) => spawn_local(async move {
            let Some(client) = auth.client() else {
                status.try_set(VerificationStatus::Invalid);
                return;
            };
            let mut data = Map::new();
            data.insert("tokenHash".into(), json!(link.token_hint()));
            telemetry::log_user_action("Email verification attempted", data);

            let request = VerifyOtpRequest {
                token_hash: link.token_hash.clone(),
                kind: link.kind,
            };
            match client.verify_otp(&request).await {
                Ok(_) => {
                    telemetry::log_user_action("Email verification successful", Map::new());
                    toasts.success(
                        "Email Verified!",
                        "Your account has been successfully verified.",
                    );
                    status.try_set(VerificationStatus::Verified);
                    let next = link.next;
                    set_timeout(
                        move || navigate(&next, Default::default()),
                        Duration::from_millis(u64::from(CONFIRM_REDIRECT_DELAY_MS)),
                    );
                }
                Err(err) => {
                    telemetry::log_error(
                        err.message(),
                        ErrorContext::component("EmailConfirmation", "verify_email"),
                    );
                    status.try_set(VerificationStatus::from_error(&err));
                }
            }
        }),
        Err((err, _)) => {
            telemetry::log_warning(
                err.to_string(),
                ErrorContext::component("EmailConfirmation", "parse_link"),
            );
            status.set(VerificationStatus::Invalid);
        }
    }

    let resend_action = Action::new_local(move |email: &Option<String>| {
        let email = email.clone();
        async move {
            let Some(email) = email else {
                toasts.error(
                    "Email Required",
                    "Please go back to the signup page to request a new verification email.",
                );
                return;
            };
            let Some(client) = auth.client() else {
                return;
            };
            let redirect = client.config().site_link(paths::CONFIRM);
            match client.resend(&ResendRequest::signup(email, Some(redirect))).await {
                Ok(()) => {
                    toasts.push(resend_success());
                    resent.set(true);
                }
                Err(err) => {
                    telemetry::log_error(
                        err.message(),
                        ErrorContext::component("EmailConfirmation", "resend_verification"),
                    );
                    toasts.push(resend_failure(&err));
                }
            }
        }
    });
    let email = StoredValue::new(email);

    view! {
        <AppShell>
            <AuthCard title="Email verification">
                {move || {
                    let current = status.get();
                    let message = if resent.get() {
                        "New verification email sent. Please check your inbox.".to_string()
                    } else {
                        current.message().to_string()
                    };
                    match current {
                        VerificationStatus::Verifying => {
                            view! {
                                <div class="flex flex-col items-center gap-3 py-6 text-gray-600">
                                    <Spinner label="Verifying your email" />
                                    <p>{message}</p>
                                </div>
                            }
                                .into_any()
                        }
                        VerificationStatus::Verified => {
                            view! { <Alert kind=AlertKind::Success message=message /> }.into_any()
                        }
                        failed if failed.offers_resend() => {
                            let kind = if resent.get() { AlertKind::Info } else { AlertKind::Error };
                            view! {
                                <div class="space-y-4">
                                    <Alert kind=kind message=message />
                                    <div class="flex flex-col gap-2 sm:flex-row">
                                        <button
                                            type="button"
                                            class="rounded-md bg-blue-600 px-4 py-2 text-sm font-medium text-white hover:bg-blue-700 disabled:opacity-50"
                                            disabled=move || resend_action.pending().get()
                                            on:click=move |_| {
                                                resend_action.dispatch(email.get_value());
                                            }
                                        >
                                            {move || {
                                                if resend_action.pending().get() {
                                                    "Sending..."
                                                } else {
                                                    "Resend verification email"
                                                }
                                            }}
                                        </button>
                                        <A
                                            href=paths::SIGNUP
                                            {..}
                                            class="rounded-md border border-gray-300 px-4 py-2 text-center text-sm font-medium text-gray-700 hover:bg-gray-50"
                                        >
                                            "Back to sign up"
                                        </A>
                                    </div>
                                </div>
                            }
                                .into_any()
                        }
                        _ => ().into_any(),
                    }
                }}
            </AuthCard>
        </AppShell>
    }
}
