//! Preferences, privacy, and account management. Preferences live in the
//! user's metadata under a single key so they follow the account across
//! devices.

use crate::app_lib::{download, telemetry};
use crate::components::layout::AppShell;
use crate::components::{Spinner, Toggle, use_toasts};
use crate::features::auth::{RouteGuard, use_auth};
use auth_state::client::UserAttributes;
use auth_state::log::ErrorContext;
use auth_state::notice::ToastSpec;
use auth_state::profile::{Preferences, Profile, ProfileVisibility};
use auth_state::routes::paths;
use auth_state::{AuthClient, AuthError, User};
use leptos::ev::MouseEvent;
use leptos::prelude::*;
use serde_json::{Map, Value, json};

const SECTION: &str = "rounded-lg bg-white shadow";

#[derive(Clone, Copy)]
struct PreferenceSignals {
    dark_mode: RwSignal<bool>,
    email_notifications: RwSignal<bool>,
    push_notifications: RwSignal<bool>,
    marketing_emails: RwSignal<bool>,
    profile_visibility: RwSignal<ProfileVisibility>,
    data_collection: RwSignal<bool>,
    third_party_sharing: RwSignal<bool>,
}

impl PreferenceSignals {
    fn new(initial: &Preferences) -> Self {
        Self {
            dark_mode: RwSignal::new(initial.dark_mode),
            email_notifications: RwSignal::new(initial.email_notifications),
            push_notifications: RwSignal::new(initial.push_notifications),
            marketing_emails: RwSignal::new(initial.marketing_emails),
            profile_visibility: RwSignal::new(initial.profile_visibility),
            data_collection: RwSignal::new(initial.data_collection),
            third_party_sharing: RwSignal::new(initial.third_party_sharing),
        }
    }

    fn load(self, preferences: Preferences) {
        self.dark_mode.set(preferences.dark_mode);
        self.email_notifications.set(preferences.email_notifications);
        self.push_notifications.set(preferences.push_notifications);
        self.marketing_emails.set(preferences.marketing_emails);
        self.profile_visibility.set(preferences.profile_visibility);
        self.data_collection.set(preferences.data_collection);
        self.third_party_sharing.set(preferences.third_party_sharing);
    }

    fn snapshot(self) -> Preferences {
        Preferences {
            dark_mode: self.dark_mode.get_untracked(),
            email_notifications: self.email_notifications.get_untracked(),
            push_notifications: self.push_notifications.get_untracked(),
            marketing_emails: self.marketing_emails.get_untracked(),
            profile_visibility: self.profile_visibility.get_untracked(),
            data_collection: self.data_collection.get_untracked(),
            third_party_sharing: self.third_party_sharing.get_untracked(),
        }
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    view! {
        <AppShell>
            <RouteGuard>
                <Settings />
            </RouteGuard>
        </AppShell>
    }
}

#[component]
fn Settings() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let preferences = PreferenceSignals::new(&Preferences::default());
    let loaded_for = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let Some(user) = auth.user.get() else {
            return;
        };
        if loaded_for.with_untracked(|loaded| loaded.as_deref() == Some(user.id.as_str())) {
            return;
        }
        preferences.load(Preferences::from_user(&user));
        loaded_for.set(Some(user.id));
    });

    let save_action = Action::new_local(move |next: &Preferences| {
        let next = next.clone();
        async move {
            let client = auth
                .client()
                .ok_or_else(|| AuthError::new("Auth is not available."))?;
            client
                .update_user(&UserAttributes::data(next.to_metadata()))
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
                telemetry::log_user_action("Preferences saved", Map::new());
                toasts.success("Preferences saved", "Your settings have been updated.");
            }
            Err(err) => {
                telemetry::log_error(
                    err.message(),
                    ErrorContext::component("SettingsPage", "save_preferences"),
                );
                toasts.error("Save failed", err.message());
            }
        }
    });

    let save = move |_: MouseEvent| {
        save_action.dispatch(preferences.snapshot());
    };
    let saving = save_action.pending();

    view! {
        <div class="max-w-4xl mx-auto px-4 py-8 sm:px-6 lg:px-8">
            <div class="mb-8">
                <h1 class="text-3xl font-bold text-gray-900">"Settings"</h1>
                <p class="mt-2 text-gray-600">
                    "Manage your app preferences, privacy settings, and account options."
                </p>
            </div>

            <div class="space-y-8">
                <section class=SECTION>
                    <SectionHeader
                        title="App Preferences"
                        description="Customize your app experience and notification settings."
                    />
                    <div class="space-y-6 p-6">
                        <Toggle
                            label="Dark Mode"
                            description="Use dark theme for better viewing in low light"
                            enabled=preferences.dark_mode
                        />
                        <Toggle
                            label="Email Notifications"
                            description="Receive email updates about your account activity"
                            enabled=preferences.email_notifications
                        />
                        <Toggle
                            label="Push Notifications"
                            description="Receive push notifications in your browser"
                            enabled=preferences.push_notifications
                        />
                        <Toggle
                            label="Marketing Emails"
                            description="Receive emails about new features and promotions"
                            enabled=preferences.marketing_emails
                        />
                    </div>
                </section>

                <section class=SECTION>
                    <SectionHeader
                        title="Privacy Settings"
                        description="Control how your data is used and shared."
                    />
                    <div class="space-y-6 p-6">
                        <fieldset>
                            <legend class="mb-1 text-sm font-medium text-gray-900">
                                "Profile Visibility"
                            </legend>
                            <p class="mb-3 text-sm text-gray-500">
                                "Choose who can see your profile information"
                            </p>
                            <div class="space-y-2">
                                {ProfileVisibility::ALL
                                    .into_iter()
                                    .map(|visibility| {
                                        let selected = preferences.profile_visibility;
                                        view! {
                                            <label class="flex items-center gap-3 text-sm text-gray-700">
                                                <input
                                                    type="radio"
                                                    name="profile-visibility"
                                                    value=visibility.as_str()
                                                    class="h-4 w-4 border-gray-300 text-blue-600 focus:ring-blue-500"
                                                    prop:checked=move || selected.get() == visibility
                                                    on:change=move |ev| {
                                                        if let Some(next) = ProfileVisibility::parse(
                                                            &event_target_value(&ev),
                                                        ) {
                                                            selected.set(next);
                                                        }
                                                    }
                                                />
                                                {visibility.label()}
                                            </label>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        </fieldset>
                        <Toggle
                            label="Analytics Data Collection"
                            description="Allow us to collect usage data to improve the app"
                            enabled=preferences.data_collection
                        />
                        <Toggle
                            label="Third-Party Data Sharing"
                            description="Allow sharing of anonymized data with partners"
                            enabled=preferences.third_party_sharing
                        />
                    </div>
                </section>

                <div class="flex items-center justify-end gap-3">
                    {move || saving.get().then(|| view! { <Spinner /> })}
                    <button
                        type="button"
                        class="rounded-md bg-blue-600 px-4 py-2 text-sm font-medium text-white transition-colors hover:bg-blue-700 disabled:opacity-50"
                        disabled=move || saving.get()
                        on:click=save
                    >
                        {move || if saving.get() { "Saving..." } else { "Save Preferences" }}
                    </button>
                </div>

                <AccountManagement preferences=preferences />
            </div>
        </div>
    }
}

#[component]
fn SectionHeader(title: &'static str, description: &'static str) -> impl IntoView {
    view! {
        <div class="border-b border-gray-200 px-6 py-4">
            <h2 class="text-lg font-medium text-gray-900">{title}</h2>
            <p class="mt-1 text-sm text-gray-500">{description}</p>
        </div>
    }
}

#[component]
fn ActionItem(
    title: &'static str,
    description: &'static str,
    button_text: &'static str,
    button_class: &'static str,
    #[prop(optional)] destructive: bool,
    #[prop(optional, into, default = Signal::from(false))] busy: Signal<bool>,
    on_click: impl Fn() + 'static,
) -> impl IntoView {
    let (title_class, description_class) = if destructive {
        ("font-medium text-red-900", "text-sm text-red-600")
    } else {
        ("font-medium text-gray-900", "text-sm text-gray-500")
    };
    view! {
        <div class="flex items-center justify-between gap-4">
            <div>
                <h3 class=title_class>{title}</h3>
                <p class=description_class>{description}</p>
            </div>
            <button
                type="button"
                class=format!("shrink-0 rounded-md px-4 py-2 text-sm font-medium transition-colors disabled:opacity-50 {button_class}")
                disabled=move || busy.get()
                on:click=move |_| on_click()
            >
                {button_text}
            </button>
        </div>
    }
}

/// JSON document offered by "Export Data".
fn export_document(user: Option<&User>, preferences: &Preferences) -> Value {
    let account = user.map(|user| {
        json!({
            "id": user.id,
            "email": user.email(),
            "createdAt": user.created_at,
            "lastSignInAt": user.last_sign_in_at,
            "emailConfirmed": user.is_email_confirmed(),
            "profile": Value::Object(Profile::from_user(user).to_metadata()),
        })
    });
    json!({
        "account": account,
        "preferences": preferences,
        "clientLog": telemetry::export_log(),
    })
}

#[component]
fn AccountManagement(preferences: PreferenceSignals) -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();

    let reset_action = Action::new_local(move |_: &()| async move {
        let client = auth
            .client()
            .ok_or_else(|| AuthError::new("Auth is not available."))?;
        let email = auth
            .user
            .with_untracked(|user| user.as_ref().map(|user| user.email().to_string()))
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AuthError::new("Your account has no email address."))?;
        let redirect = client.config().site_link(paths::RESET_PASSWORD);
        client.reset_password_for_email(&email, Some(&redirect)).await
    });

    Effect::new(move |_| {
        let Some(result) = reset_action.value().get() else {
            return;
        };
        match result {
            Ok(()) => toasts.success(
                "Check your email",
                "We sent you a link to choose a new password.",
            ),
            Err(err) => {
                telemetry::log_error(
                    err.message(),
                    ErrorContext::component("SettingsPage", "change_password"),
                );
                toasts.error("Failed to Send", err.message());
            }
        }
    });

    let export = move || {
        let document = auth
            .user
            .with_untracked(|user| export_document(user.as_ref(), &preferences.snapshot()));
        match download::save_json("trailhead-export.json", &document) {
            Ok(()) => {
                telemetry::log_user_action("Data exported", Map::new());
                toasts.success("Export ready", "Your data has been downloaded.");
            }
            Err(err) => {
                telemetry::log_error(
                    err.to_string(),
                    ErrorContext::component("SettingsPage", "export_data"),
                );
                toasts.error("Export failed", "Could not prepare your data. Please try again.");
            }
        }
    };

    let enable_two_factor = move || {
        toasts.push(ToastSpec::info(
            "Coming soon",
            "Two-factor authentication is not available yet.",
        ));
    };

    let delete_account = move || {
        let confirmed = web_sys::window()
            .and_then(|window| {
                window
                    .confirm_with_message(
                        "Are you sure you want to delete your account? This action cannot be undone.",
                    )
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        telemetry::log_user_action("Account deletion requested", Map::new());
        toasts.push(ToastSpec::info(
            "Deletion requested",
            "Account deletion process initiated. Please check your email for confirmation.",
        ));
    };

    view! {
        <section class=SECTION>
            <SectionHeader
                title="Account Management"
                description="Manage your account data and security options."
            />
            <div class="space-y-6 p-6">
                <ActionItem
                    title="Export Your Data"
                    description="Download a copy of all your account data"
                    button_text="Export Data"
                    button_class="bg-gray-100 text-gray-800 hover:bg-gray-200"
                    on_click=export
                />
                <ActionItem
                    title="Change Password"
                    description="We'll email you a link to set a new password"
                    button_text="Change Password"
                    button_class="bg-blue-600 text-white hover:bg-blue-700"
                    busy=reset_action.pending()
                    on_click=move || {
                        reset_action.dispatch(());
                    }
                />
                <ActionItem
                    title="Two-Factor Authentication"
                    description="Add an extra layer of security to your account"
                    button_text="Enable 2FA"
                    button_class="bg-green-600 text-white hover:bg-green-700"
                    on_click=enable_two_factor
                />
                <div class="border-t border-gray-200 pt-6">
                    <ActionItem
                        title="Delete Account"
                        description="Permanently delete your account and all associated data"
                        button_text="Delete Account"
                        button_class="bg-red-600 text-white hover:bg-red-700"
                        destructive=true
                        on_click=delete_account
                    />
                    <div class="mt-3 rounded-md border border-red-200 bg-red-50 p-3">
                        <p class="text-xs text-red-700">
                            <strong>"Warning: "</strong>
                            "This action cannot be undone. All your data, projects, and account information will be permanently deleted."
                        </p>
                    </div>
                </div>
            </div>
        </section>
    }
}
