//! Landing page for password recovery links. The link is exchanged for a
//! recovery session first; only then is the new password form shown. Visitors
//! who arrive without a link but already hold a session may also set a new
//! password here.

use crate::app_lib::telemetry;
use crate::components::layout::AppShell;
use crate::components::{
    Alert, AlertKind, Button, FullPageSpinner, Spinner, TextField, use_toasts,
};
use crate::features::auth::use_auth;
use crate::routes::form::{AuthCard, FormFeedback};
use auth_state::client::{OtpKind, UserAttributes, VerifyOtpRequest};
use auth_state::flows::{LinkError, RESET_REDIRECT_DELAY_MS, RecoveryLink, ResetStatus};
use auth_state::log::ErrorContext;
use auth_state::notice::{ResetFailure, reset_password_failure};
use auth_state::routes::paths;
use auth_state::validation::{Field, NewPasswordForm};
use auth_state::{AuthClient, AuthError, AuthErrorKind};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_location, use_navigate};
use std::time::Duration;

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let status = RwSignal::new(ResetStatus::Verifying);
    let link = RecoveryLink::parse(
        location.search.get_untracked().trim_start_matches('?'),
        location.hash.get_untracked().trim_start_matches('#'),
    );

    match link {
        Ok(link) => {
            spawn_local(async move {
                let Some(client) = auth.client() else {
                    status.set(ResetStatus::from_link_error(&LinkError::Missing));
                    return;
                };
                let result = match link {
                    RecoveryLink::TokenHash(token_hash) => client
                        .verify_otp(&VerifyOtpRequest {
                            token_hash,
                            kind: OtpKind::Recovery,
                        })
                        .await
                        .and_then(|session| {
                            session.map(|_| ()).ok_or_else(|| {
                                AuthError::new("This password reset link is invalid or has expired.")
                            })
                        }),
                    RecoveryLink::Tokens {
                        access_token,
                        refresh_token,
                    } => client
                        .set_session_from_tokens(&access_token, &refresh_token)
                        .await
                        .map(|_| ()),
                };
                let next = match result {
                    Ok(()) => ResetStatus::Ready,
                    Err(err) => {
                        telemetry::log_error(
                            err.message(),
                            ErrorContext::component("ResetPasswordPage", "verify_recovery_link"),
                        );
                        let link_error = match err.kind() {
                            AuthErrorKind::OtpExpired => LinkError::Expired,
                            _ => LinkError::Invalid(
                                "This password reset link is invalid or has expired.".to_string(),
                            ),
                        };
                        ResetStatus::from_link_error(&link_error)
                    }
                };
                status.try_set(next);
            });
        }
        Err(LinkError::Missing) => {
            // No link: a signed-in visitor may still change the password.
            Effect::new(move |_| {
                if auth.is_loading.get()
                    || status.with_untracked(|status| *status != ResetStatus::Verifying)
                {
                    return;
                }
                status.set(if auth.is_authenticated.get_untracked() {
                    ResetStatus::Ready
                } else {
                    ResetStatus::from_link_error(&LinkError::Missing)
                });
            });
        }
        Err(err) => status.set(ResetStatus::from_link_error(&err)),
    }

    view! {
        <AppShell>
            <AuthCard title="Set a new password">
                {move || {
                    let current = status.get();
                    match &current {
                        ResetStatus::Verifying => view! { <FullPageSpinner /> }.into_any(),
                        ResetStatus::Ready => view! { <NewPasswordPanel status=status /> }.into_any(),
                        ResetStatus::Updated => {
                            view! {
                                <Alert kind=AlertKind::Success message=current.message().to_string() />
                            }
                                .into_any()
                        }
                        ResetStatus::Invalid(_) | ResetStatus::Expired(_) => {
                            view! {
                                <div class="space-y-4">
                                    <Alert kind=AlertKind::Error message=current.message().to_string() />
                                    <A
                                        href=paths::FORGOT_PASSWORD
                                        {..}
                                        class="inline-block text-sm font-medium text-blue-600 hover:text-blue-500"
                                    >
                                        "Request a new reset link"
                                    </A>
                                </div>
                            }
                                .into_any()
                        }
                    }
                }}
            </AuthCard>
        </AppShell>
    }
}

#[component]
fn NewPasswordPanel(status: RwSignal<ResetStatus>) -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let navigate = use_navigate();
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let feedback = FormFeedback::new();
    let errors = feedback.errors(move || {
        NewPasswordForm {
            password: password.get(),
            confirm_password: confirm_password.get(),
        }
        .validate()
    });

    let update_action = Action::new_local(move |password: &String| {
        let password = password.clone();
        async move {
            let client = auth
                .client()
                .ok_or_else(|| AuthError::new("Auth is not available."))?;
            client
                .update_user(&UserAttributes::password(password))
                .await
                .map(|_| ())
        }
    });

    Effect::new(move |_| {
        let Some(result) = update_action.value().get() else {
            return;
        };
        match result {
            Ok(()) => {
                telemetry::log_user_action("Password reset completed", serde_json::Map::new());
                toasts.success("Password Updated!", "Your password has been changed successfully.");
                status.set(ResetStatus::Updated);
                let navigate = navigate.clone();
                set_timeout(
                    move || navigate(paths::DASHBOARD, Default::default()),
                    Duration::from_millis(u64::from(RESET_REDIRECT_DELAY_MS)),
                );
            }
            Err(err) => {
                telemetry::log_error(
                    err.message(),
                    ErrorContext::component("ResetPasswordForm", "password_update"),
                );
                match reset_password_failure(&err) {
                    ResetFailure::Expired(message) => {
                        toasts.error("Session Expired", &message);
                        status.set(ResetStatus::Expired(message));
                    }
                    ResetFailure::Notice(notice) => feedback.show(&notice, toasts),
                }
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        if !feedback.submit(errors, toasts) {
            return;
        }
        update_action.dispatch(password.get_untracked());
    };

    let busy = update_action.pending();

    view! {
        <form class="space-y-4" on:submit=on_submit novalidate>
            <p class="text-sm text-gray-600">{ResetStatus::Ready.message().to_string()}</p>
            {feedback.banner_view()}
            <TextField
                id="password"
                label="New password"
                input_type="password"
                autocomplete="new-password"
                value=password
                error=feedback.field_error(errors, Field::Password)
                disabled=busy
            />
            <TextField
                id="confirm-password"
                label="Confirm new password"
                input_type="password"
                autocomplete="new-password"
                value=confirm_password
                error=feedback.field_error(errors, Field::ConfirmPassword)
                disabled=busy
            />
            <div class="flex items-center gap-3">
                <Button button_type="submit" disabled=busy>
                    {move || if busy.get() { "Updating..." } else { "Update password" }}
                </Button>
                {move || busy.get().then(|| view! { <Spinner /> })}
            </div>
        </form>
    }
}
