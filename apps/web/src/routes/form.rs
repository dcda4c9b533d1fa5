//! Shared form plumbing for the account pages: validate on submit, then on
//! every keystroke, and merge server-side failures into the same display.

use crate::components::{Alert, AlertKind, Toasts};
use auth_state::{
    notice::FailureNotice,
    validation::{Field, FieldErrors},
};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct FormFeedback {
    attempted: RwSignal<bool>,
    pub banner: RwSignal<Option<String>>,
    server_field: RwSignal<Option<(Field, String)>>,
}

impl FormFeedback {
    pub fn new() -> Self {
        Self {
            attempted: RwSignal::new(false),
            banner: RwSignal::new(None),
            server_field: RwSignal::new(None),
        }
    }

    /// Field errors from `validate`, live once the form was submitted once.
    pub fn errors(
        self,
        validate: impl Fn() -> FieldErrors + Send + Sync + 'static,
    ) -> Memo<FieldErrors> {
        let attempted = self.attempted;
        Memo::new(move |_| {
            if attempted.get() {
                validate()
            } else {
                FieldErrors::new()
            }
        })
    }

    pub fn field_error(self, errors: Memo<FieldErrors>, field: Field) -> Signal<Option<String>> {
        let server_field = self.server_field;
        Signal::derive(move || {
            errors
                .with(|errors| errors.get(field).map(str::to_string))
                .or_else(|| {
                    server_field.with(|server| {
                        server
                            .as_ref()
                            .filter(|(failed, _)| *failed == field)
                            .map(|(_, message)| message.clone())
                    })
                })
        })
    }

    /// Marks a submit attempt and clears earlier server feedback. Returns
    /// whether the form may be sent.
    pub fn submit(self, errors: Memo<FieldErrors>, toasts: Toasts) -> bool {
        self.attempted.set(true);
        self.banner.set(None);
        self.server_field.set(None);
        let valid = errors.with_untracked(FieldErrors::is_empty);
        if !valid {
            toasts.error("Check the form", "Please fix the errors below.");
        }
        valid
    }

    pub fn show(self, notice: &FailureNotice, toasts: Toasts) {
        self.banner.set(notice.banner.clone());
        self.server_field.set(notice.field.clone());
        if let Some(toast) = notice.toast.clone() {
            toasts.push(toast);
        }
    }

    pub fn reset(self) {
        self.attempted.set(false);
        self.banner.set(None);
        self.server_field.set(None);
    }

    pub fn banner_view(self) -> impl IntoView {
        let banner = self.banner;
        move || {
            banner
                .get()
                .map(|message| view! { <Alert kind=AlertKind::Error message=message /> })
        }
    }
}

/// Page-level card used by the account forms.
#[component]
pub fn AuthCard(
    title: &'static str,
    #[prop(optional)] subtitle: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12 px-4 sm:px-6 lg:px-8">
            <div class="max-w-md w-full space-y-6 rounded-lg bg-white p-8 shadow-lg">
                <div class="text-center">
                    <h1 class="text-2xl font-bold text-gray-900">{title}</h1>
                    {subtitle.map(|text| view! { <p class="mt-2 text-sm text-gray-600">{text}</p> })}
                </div>
                {children()}
            </div>
        </div>
    }
}
