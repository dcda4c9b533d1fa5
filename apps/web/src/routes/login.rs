use crate::app_lib::telemetry;
use crate::components::layout::AppShell;
use crate::components::{Button, Spinner, TextField, use_toasts};
use crate::features::auth::{RouteGuard, use_auth};
use crate::routes::form::{AuthCard, FormFeedback};
use auth_state::client::ResendRequest;
use auth_state::log::ErrorContext;
use auth_state::notice::{login_failure, resend_failure, resend_success};
use auth_state::routes::paths;
use auth_state::validation::{Field, LoginForm};
use auth_state::{AuthClient, AuthError, PasswordCredentials};
use leptos::ev::{MouseEvent, SubmitEvent};
use leptos::prelude::*;
use leptos_router::components::A;
use serde_json::{Map, json};

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <AppShell>
            <RouteGuard>
                <LoginPanel />
            </RouteGuard>
        </AppShell>
    }
}

#[component]
fn LoginPanel() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_verification_help = RwSignal::new(false);
    let feedback = FormFeedback::new();
    let errors = feedback.errors(move || {
        LoginForm {
            email: email.get(),
            password: password.get(),
        }
        .validate()
    });

    // Navigation after success is left to the auth-only guard.
    let login_action = Action::new_local(move |credentials: &PasswordCredentials| {
        let credentials = credentials.clone();
        async move {
            let client = auth
                .client()
                .ok_or_else(|| AuthError::new("Auth is not available."))?;
            client.sign_in_with_password(&credentials).await.map(|_| ())
        }
    });

    Effect::new(move |_| {
        let Some(result) = login_action.value().get() else {
            return;
        };
        match result {
            Ok(()) => {
                telemetry::log_user_action("Login successful", Map::new());
                toasts.success("Welcome back!", "Successfully signed in.");
            }
            Err(err) => {
                telemetry::log_error(
                    err.message(),
                    ErrorContext::component("LoginForm", "user_login"),
                );
                let notice = login_failure(&err);
                show_verification_help.set(notice.show_verification_help);
                feedback.show(&notice, toasts);
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
            let mut data = Map::new();
            data.insert("email".into(), json!(email));
            telemetry::log_user_action("Resend verification from login", data);
            match client.resend(&ResendRequest::signup(email, Some(redirect))).await {
                Ok(()) => toasts.push(resend_success()),
                Err(err) => toasts.push(resend_failure(&err)),
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        show_verification_help.set(false);
        if !feedback.submit(errors, toasts) {
            return;
        }
        login_action.dispatch(PasswordCredentials {
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        });
    };

    let on_resend = move |_: MouseEvent| {
        let value = email.get_untracked().trim().to_string();
        if value.is_empty() {
            toasts.error("Email Required", "Please enter your email address first.");
            return;
        }
        resend_action.dispatch(value);
    };

    let busy = login_action.pending();

    view! {
        <AuthCard title="Sign in to your account" subtitle="Welcome back. Enter your details below.">
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
                <TextField
                    id="password"
                    label="Password"
                    input_type="password"
                    autocomplete="current-password"
                    value=password
                    error=feedback.field_error(errors, Field::Password)
                    disabled=busy
                />
                <div class="flex items-center justify-between text-sm">
                    <A href=paths::FORGOT_PASSWORD {..} class="text-blue-600 hover:text-blue-500">
                        "Forgot your password?"
                    </A>
                </div>
                <div class="flex items-center gap-3">
                    <Button button_type="submit" disabled=busy>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </Button>
                    {move || busy.get().then(|| view! { <Spinner /> })}
                </div>
            </form>
            {move || {
                show_verification_help
                    .get()
                    .then(|| {
                        view! {
                            <div class="rounded-lg border border-blue-200 bg-blue-50 p-4 text-sm text-blue-800">
                                <p class="font-semibold">"Need to verify your email?"</p>
                                <p class="mt-1">
                                    "Check your inbox for the verification link, or request a new one."
                                </p>
                                <button
                                    type="button"
                                    class="mt-3 rounded bg-blue-100 px-3 py-1 font-medium hover:bg-blue-200 disabled:opacity-50"
                                    disabled=move || resend_action.pending().get()
                                    on:click=on_resend
                                >
                                    {move || {
                                        if resend_action.pending().get() {
                                            "Sending..."
                                        } else {
                                            "Resend verification email"
                                        }
                                    }}
                                </button>
                            </div>
                        }
                    })
            }}
            <p class="text-center text-sm text-gray-600">
                "Don't have an account? "
                <A href=paths::SIGNUP {..} class="font-medium text-blue-600 hover:text-blue-500">
                    "Sign up"
                </A>
            </p>
        </AuthCard>
    }
}
