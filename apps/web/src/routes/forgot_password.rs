use crate::app_lib::telemetry;
use crate::components::layout::AppShell;
use crate::components::{Alert, AlertKind, Button, Spinner, TextField, use_toasts};
use crate::features::auth::{RouteGuard, use_auth};
use crate::routes::form::{AuthCard, FormFeedback};
use auth_state::log::ErrorContext;
use auth_state::notice::{RESET_LINK_SENT, forgot_password_failure};
use auth_state::routes::paths;
use auth_state::validation::{Field, ForgotPasswordForm};
use auth_state::{AuthClient, AuthError};
use leptos::ev::{MouseEvent, SubmitEvent};
use leptos::prelude::*;
use leptos_router::components::A;
use serde_json::{Map, json};

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    view! {
        <AppShell>
            <RouteGuard>
                <ForgotPasswordPanel />
            </RouteGuard>
        </AppShell>
    }
}

#[component]
fn ForgotPasswordPanel() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let email = RwSignal::new(String::new());
    let sent = RwSignal::new(false);
    let feedback = FormFeedback::new();
    let errors = feedback.errors(move || ForgotPasswordForm { email: email.get() }.validate());

    let reset_action = Action::new_local(move |email: &String| {
        let email = email.clone();
        async move {
            let client = auth
                .client()
                .ok_or_else(|| AuthError::new("Auth is not available."))?;
            let redirect = client.config().site_link(paths::RESET_PASSWORD);
            client.reset_password_for_email(&email, Some(&redirect)).await
        }
    });

    Effect::new(move |_| {
        let Some(result) = reset_action.value().get() else {
            return;
        };
        match result {
            Ok(()) => {
                telemetry::log_user_action("Password reset email sent", Map::new());
                toasts.success("Email Sent!", RESET_LINK_SENT);
                sent.set(true);
            }
            Err(err) => {
                telemetry::log_error(
                    err.message(),
                    ErrorContext::component("ForgotPasswordForm", "password_reset_request"),
                );
                let notice = forgot_password_failure(&err);
                feedback.show(&notice, toasts);
                if notice.treat_as_sent {
                    sent.set(true);
                }
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        if !feedback.submit(errors, toasts) {
            return;
        }
        let value = email.get_untracked().trim().to_string();
        let mut data = Map::new();
        data.insert("email".into(), json!(value));
        telemetry::log_user_action("Password reset requested", data);
        reset_action.dispatch(value);
    };

    let try_again = move |_: MouseEvent| {
        sent.set(false);
        feedback.reset();
    };

    let busy = reset_action.pending();

    view! {
        <AuthCard
            title="Reset your password"
            subtitle="Enter the email you signed up with and we'll send you a reset link."
        >
            {move || {
                if sent.get() {
                    view! {
                        <div class="space-y-4">
                            <Alert kind=AlertKind::Success message=RESET_LINK_SENT.to_string() />
                            <p class="text-sm text-gray-600">
                                "Didn't get an email? Check your spam folder or try again."
                            </p>
                            <button
                                type="button"
                                class="text-sm font-medium text-blue-600 hover:text-blue-500"
                                on:click=try_again
                            >
                                "Try again"
                            </button>
                        </div>
                    }
                        .into_any()
                } else {
                    view! {
                        <form class="space-y-4" on:submit=on_submit novalidate>
                            {feedback.banner_view()}
                            <TextField
                                id="email"
                                label="Email address"
                                input_type="email"
                                autocomplete="email"
                                placeholder="you@example.com"
                                value=email
                                error=feedback.field_error(errors, Field::Email)
                                disabled=busy
                            />
                            <div class="flex items-center gap-3">
                                <Button button_type="submit" disabled=busy>
                                    {move || if busy.get() { "Sending..." } else { "Send reset link" }}
                                </Button>
                                {move || busy.get().then(|| view! { <Spinner /> })}
                            </div>
                        </form>
                    }
                        .into_any()
                }
            }}
            <p class="text-center text-sm text-gray-600">
                "Remembered it? "
                <A href=paths::LOGIN {..} class="font-medium text-blue-600 hover:text-blue-500">
                    "Back to sign in"
                </A>
            </p>
        </AuthCard>
    }
}
