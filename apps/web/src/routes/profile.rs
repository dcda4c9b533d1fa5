use crate::app_lib::telemetry;
use crate::components::layout::AppShell;
use crate::components::{Alert, AlertKind, Button, Spinner, TextField, use_toasts};
use crate::features::auth::{RouteGuard, use_auth};
use crate::routes::form::FormFeedback;
use auth_state::client::UserAttributes;
use auth_state::log::ErrorContext;
use auth_state::profile::Profile;
use auth_state::validation::{Field, MAX_BIO_CHARS, ProfileForm};
use auth_state::{AuthClient, AuthError, User};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use std::time::Duration;
use wasm_bindgen::JsValue;

const SUCCESS_VISIBLE_MS: u64 = 3_000;

/// Locale date for an ISO timestamp, or "Unknown".
fn format_date(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "Unknown".to_string();
    };
    let date = js_sys::Date::new(&JsValue::from_str(value));
    if date.get_time().is_nan() {
        return "Unknown".to_string();
    }
    date.to_locale_date_string("default", &JsValue::UNDEFINED)
        .as_string()
        .unwrap_or_else(|| value.to_string())
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    view! {
        <AppShell>
            <RouteGuard>
                <div class="max-w-3xl mx-auto px-4 py-8 sm:px-6 lg:px-8">
                    <div class="mb-8">
                        <h1 class="text-3xl font-bold text-gray-900">"Profile"</h1>
                        <p class="mt-2 text-gray-600">
                            "Manage your personal information and preferences."
                        </p>
                    </div>
                    <ProfileEditor />
                    <AccountInformation />
                </div>
            </RouteGuard>
        </AppShell>
    }
}

#[component]
fn ProfileEditor() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let name = RwSignal::new(String::new());
    let bio = RwSignal::new(String::new());
    let location = RwSignal::new(String::new());
    let saved = RwSignal::new(false);
    let loaded_for = RwSignal::new(None::<String>);
    let feedback = FormFeedback::new();
    let errors = feedback.errors(move || {
        ProfileForm {
            name: name.get(),
            bio: bio.get(),
            location: location.get(),
        }
        .validate()
    });
    let bio_error = feedback.field_error(errors, Field::Bio);

    // Fill the form once per signed-in user; later metadata updates must not
    // overwrite edits in progress.
    Effect::new(move |_| {
        let Some(user) = auth.user.get() else {
            return;
        };
        if loaded_for.with_untracked(|loaded| loaded.as_deref() == Some(user.id.as_str())) {
            return;
        }
        let profile = Profile::from_user(&user);
        name.set(profile.name);
        bio.set(profile.bio);
        location.set(profile.location);
        loaded_for.set(Some(user.id));
    });

    let save_action = Action::new_local(move |profile: &Profile| {
        let profile = profile.clone();
        async move {
            let client = auth
                .client()
                .ok_or_else(|| AuthError::new("Auth is not available."))?;
            client
                .update_user(&UserAttributes::data(profile.to_metadata()))
                .await
                .map(|_| ())
        }
    });

    Effect::new(move |_| {
        let Some(result) = save_action.value().get() else {
            return;
        };
        match result {
            Ok(()) => {
                telemetry::log_user_action("Profile updated", serde_json::Map::new());
                toasts.success("Profile updated", "Your changes have been saved.");
                saved.set(true);
                set_timeout(
                    move || {
                        saved.try_set(false);
                    },
                    Duration::from_millis(SUCCESS_VISIBLE_MS),
                );
            }
            Err(err) => {
                telemetry::log_error(
                    err.message(),
                    ErrorContext::component("ProfilePage", "update_profile"),
                );
                let message = if err.message().trim().is_empty() {
                    "An unexpected error occurred. Please try again.".to_string()
                } else {
                    err.message().to_string()
                };
                feedback.banner.set(Some(message));
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        saved.set(false);
        if !feedback.submit(errors, toasts) {
            return;
        }
        save_action.dispatch(Profile {
            name: name.get_untracked(),
            bio: bio.get_untracked(),
            location: location.get_untracked(),
        });
    };

    let busy = save_action.pending();
    let email = move || auth.user.with(|user| user.as_ref().map(|user| user.email().to_string()));

    view! {
        <section class="rounded-lg bg-white shadow">
            <div class="border-b border-gray-200 px-6 py-4">
                <h2 class="text-lg font-medium text-gray-900">"Personal Information"</h2>
                <p class="mt-1 text-sm text-gray-500">"Update your profile details below."</p>
            </div>
            <form class="space-y-6 p-6" on:submit=on_submit novalidate>
                <div>
                    <label for="email" class="block text-sm font-medium text-gray-700">
                        "Email address"
                    </label>
                    <input
                        id="email"
                        type="email"
                        class="mt-1 block w-full cursor-not-allowed rounded-md border border-gray-300 bg-gray-50 px-3 py-2 text-gray-500 sm:text-sm"
                        prop:value=move || email().unwrap_or_default()
                        disabled
                    />
                    <p class="mt-1 text-xs text-gray-500">"Email cannot be changed here."</p>
                </div>
                <TextField
                    id="name"
                    label="Full name"
                    autocomplete="name"
                    placeholder="Enter your full name"
                    value=name
                    error=feedback.field_error(errors, Field::Name)
                    disabled=busy
                />
                <div>
                    <label for="bio" class="block text-sm font-medium text-gray-700">
                        "Bio"
                    </label>
                    <textarea
                        id="bio"
                        rows="4"
                        class="mt-1 block w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-blue-500 sm:text-sm"
                        placeholder="Tell us a little about yourself..."
                        prop:value=move || bio.get()
                        on:input=move |ev| bio.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    ></textarea>
                    <p class="mt-1 text-xs text-gray-500">
                        {move || {
                            format!(
                                "Brief description for your profile. {} / {MAX_BIO_CHARS} characters.",
                                bio.with(|bio| bio.chars().count()),
                            )
                        }}
                    </p>
                    {move || {
                        bio_error
                            .get()
                            .map(|message| view! { <p class="mt-1 text-sm text-red-600">{message}</p> })
                    }}
                </div>
                <TextField
                    id="location"
                    label="Location"
                    placeholder="City, Country"
                    value=location
                    disabled=busy
                />
                {move || {
                    saved
                        .get()
                        .then(|| {
                            view! {
                                <Alert
                                    kind=AlertKind::Success
                                    message="Profile updated successfully!".to_string()
                                />
                            }
                        })
                }}
                {feedback.banner_view()}
                <div class="flex items-center justify-end gap-3">
                    {move || busy.get().then(|| view! { <Spinner /> })}
                    <Button button_type="submit" disabled=busy>
                        {move || if busy.get() { "Updating..." } else { "Update Profile" }}
                    </Button>
                </div>
            </form>
        </section>
    }
}

#[component]
fn AccountInformation() -> impl IntoView {
    let auth = use_auth();
    let field = move |read: fn(&User) -> String| {
        move || {
            auth.user
                .with(|user| user.as_ref().map(read))
                .unwrap_or_else(|| "Unknown".to_string())
        }
    };
    let verified = move || {
        auth.user
            .with(|user| user.as_ref().is_some_and(User::is_email_confirmed))
    };

    view! {
        <section class="mt-8 rounded-lg bg-white shadow">
            <div class="border-b border-gray-200 px-6 py-4">
                <h2 class="text-lg font-medium text-gray-900">"Account Information"</h2>
                <p class="mt-1 text-sm text-gray-500">
                    "View your account details and membership information."
                </p>
            </div>
            <dl class="grid grid-cols-1 gap-x-4 gap-y-6 p-6 sm:grid-cols-2">
                <div>
                    <dt class="text-sm font-medium text-gray-500">"Account Created"</dt>
                    <dd class="mt-1 text-sm text-gray-900">
                        {field(|user| format_date(user.created_at.as_deref()))}
                    </dd>
                </div>
                <div>
                    <dt class="text-sm font-medium text-gray-500">"Last Sign In"</dt>
                    <dd class="mt-1 text-sm text-gray-900">
                        {field(|user| format_date(user.last_sign_in_at.as_deref()))}
                    </dd>
                </div>
                <div>
                    <dt class="text-sm font-medium text-gray-500">"Email Verified"</dt>
                    <dd class="mt-1 text-sm">
                        <span class=move || {
                            if verified() {
                                "inline-flex items-center rounded-full bg-green-100 px-2.5 py-0.5 text-xs font-medium text-green-800"
                            } else {
                                "inline-flex items-center rounded-full bg-yellow-100 px-2.5 py-0.5 text-xs font-medium text-yellow-800"
                            }
                        }>
                            {move || if verified() { "Verified" } else { "Pending Verification" }}
                        </span>
                    </dd>
                </div>
                <div>
                    <dt class="text-sm font-medium text-gray-500">"User ID"</dt>
                    <dd class="mt-1 font-mono text-sm text-gray-900">{field(User::short_id)}</dd>
                </div>
            </dl>
        </section>
    }
}
