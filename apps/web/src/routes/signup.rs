//! Account registration. Projects with email confirmation enabled return a
//! bare user; the page then switches to a "check your inbox" prompt that keeps
//! the email around for a resend.

use crate::app_lib::telemetry;
use crate::components::layout::AppShell;
use crate::components::{Alert, AlertKind, Button, Spinner, TextField, use_toasts};
use crate::features::auth::{RouteGuard, use_auth};
use crate::routes::form::{AuthCard, FormFeedback};
use auth_state::client::{ResendRequest, SignUpRequest};
use auth_state::log::ErrorContext;
use auth_state::notice::{resend_failure, resend_success, signup_failure};
use auth_state::routes::paths;
use auth_state::validation::{Field, SignupForm};
use auth_state::{AuthClient, AuthError, PasswordCredentials, SignUpOutcome};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::components::A;
use serde_json::{Map, json};

#[component]
pub fn SignUpPage() -> impl IntoView {
    view! {
        <AppShell>
            <RouteGuard>
                <SignUpPanel />
            </RouteGuard>
        </AppShell>
    }
}

#[component]
fn SignUpPanel() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let awaiting_confirmation = RwSignal::new(false);
    let feedback = FormFeedback::new();
    let errors = feedback.errors(move || {
        SignupForm {
            name: name.get(),
            email: email.get(),
            password: password.get(),
            confirm_password: confirm_password.get(),
        }
        .validate()
    });

    let signup_action = Action::new_local(move |request: &SignUpRequest| {
        let request = request.clone();
        async move {
            let client = auth
                .client()
                .ok_or_else(|| AuthError::new("Auth is not available."))?;
            let request = SignUpRequest {
                email_redirect_to: Some(client.config().site_link(paths::CONFIRM)),
                ..request
            };
            client.sign_up(&request).await
        }
    });

    Effect::new(move |_| {
        let Some(result) = signup_action.value().get() else {
            return;
        };
        match result {
            Ok(outcome) => {
                let mut data = Map::new();
                data.insert("userId".into(), json!(outcome.user().id));
                data.insert(
                    "emailConfirmed".into(),
                    json!(outcome.user().is_email_confirmed()),
                );
                telemetry::log_user_action("Signup successful", data);
                match outcome {
                    SignUpOutcome::SignedIn(_) => {
                        toasts.success("Account created!", "Welcome! You are now signed in.");
                    }
                    SignUpOutcome::ConfirmationRequired(_) => {
                        toasts.success(
                            "Account created!",
                            "Please check your email for a confirmation link to activate your account.",
                        );
                        name.set(String::new());
                        password.set(String::new());
                        confirm_password.set(String::new());
                        feedback.reset();
                        awaiting_confirmation.set(true);
                    }
                }
            }
            Err(err) => {
                telemetry::log_error(
                    err.message(),
                    ErrorContext::component("SignupForm", "user_signup"),
                );
                feedback.show(&signup_failure(&err), toasts);
            }
        }
    });

    let resend_action = Action::new_local(move |email: &String| {
        let email = email.clone();
        async move {
            let Some(client) = auth.client() else {
                return;
            };
            let redirect = client.config().site_link(paths::CONFIRM);
            match client.resend(&ResendRequest::signup(email, Some(redirect))).await {
                Ok(()) => toasts.push(resend_success()),
                Err(err) => toasts.push(resend_failure(&err)),
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        if !feedback.submit(errors, toasts) {
            let mut data = Map::new();
            data.insert("errors".into(), json!(errors.with_untracked(|errors| errors.len())));
            telemetry::log_user_action("Signup validation failed", data);
            return;
        }
        let email = email.get_untracked().trim().to_string();
        let mut data = Map::new();
        data.insert("email".into(), json!(email));
        telemetry::log_user_action("Signup attempt started", data);

        let mut metadata = Map::new();
        metadata.insert("name".into(), json!(name.get_untracked().trim()));
        signup_action.dispatch(SignUpRequest {
            credentials: PasswordCredentials {
                email,
                password: password.get_untracked(),
            },
            data: metadata,
            email_redirect_to: None,
        });
    };

    let busy = signup_action.pending();

    let form = move || {
        view! {
            <form class="space-y-4" on:submit=on_submit novalidate>
                {feedback.banner_view()}
                <TextField
                    id="name"
                    label="Full name"
                    autocomplete="name"
                    placeholder="Jane Doe"
                    value=name
                    error=feedback.field_error(errors, Field::Name)
                    disabled=busy
                />
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
                <TextField
                    id="password"
                    label="Password"
                    input_type="password"
                    autocomplete="new-password"
                    value=password
                    error=feedback.field_error(errors, Field::Password)
                    disabled=busy
                />
                <TextField
                    id="confirm-password"
                    label="Confirm password"
                    input_type="password"
                    autocomplete="new-password"
                    value=confirm_password
                    error=feedback.field_error(errors, Field::ConfirmPassword)
                    disabled=busy
                />
                <div class="flex items-center gap-3">
                    <Button button_type="submit" disabled=busy>
                        {move || if busy.get() { "Creating account..." } else { "Create account" }}
                    </Button>
                    {move || busy.get().then(|| view! { <Spinner /> })}
                </div>
            </form>
        }
    };

    let prompt = move || {
        let sent_to = email.get_untracked();
        view! {
            <div class="space-y-4">
                <Alert
                    kind=AlertKind::Success
                    message=format!(
                        "We sent a confirmation link to {sent_to}. Follow it to activate your account.",
                    )
                />
                <div class="flex flex-col gap-2 sm:flex-row">
                    <button
                        type="button"
                        class="rounded-md bg-blue-100 px-4 py-2 text-sm font-medium text-blue-800 hover:bg-blue-200 disabled:opacity-50"
                        disabled=move || resend_action.pending().get()
                        on:click=move |_| {
                            resend_action.dispatch(email.get_untracked().trim().to_string());
                        }
                    >
                        {move || {
                            if resend_action.pending().get() {
                                "Sending..."
                            } else {
                                "Resend confirmation email"
                            }
                        }}
                    </button>
                    <button
                        type="button"
                        class="rounded-md border border-gray-300 px-4 py-2 text-sm font-medium text-gray-700 hover:bg-gray-50"
                        on:click=move |_| awaiting_confirmation.set(false)
                    >
                        "Use a different email"
                    </button>
                </div>
            </div>
        }
    };

    view! {
        <AuthCard title="Create your account" subtitle="Start with an email and a password.">
            {move || {
                if awaiting_confirmation.get() {
                    prompt().into_any()
                } else {
                    form().into_any()
                }
            }}
            <p class="text-center text-sm text-gray-600">
                "Already have an account? "
                <A href=paths::LOGIN {..} class="font-medium text-blue-600 hover:text-blue-500">
                    "Sign in"
                </A>
            </p>
        </AuthCard>
    }
}
