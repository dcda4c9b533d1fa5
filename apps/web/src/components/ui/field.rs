//! Labeled form inputs with inline validation messages.

use leptos::prelude::*;

const BASE: &str = "appearance-none relative block w-full px-3 py-2 border placeholder-gray-500 text-gray-900 rounded-md focus:outline-none focus:z-10 sm:text-sm transition-colors";

fn input_class(has_error: bool) -> String {
    if has_error {
        format!("{BASE} border-red-300 focus:ring-red-500 focus:border-red-500")
    } else {
        format!("{BASE} border-gray-300 focus:ring-blue-500 focus:border-blue-500")
    }
}

#[component]
pub fn TextField(
    id: &'static str,
    label: &'static str,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional)] autocomplete: Option<&'static str>,
    #[prop(optional)] placeholder: Option<&'static str>,
    value: RwSignal<String>,
    #[prop(optional, into, default = Signal::derive(|| None))] error: Signal<Option<String>>,
    #[prop(optional, into, default = Signal::from(false))] disabled: Signal<bool>,
) -> impl IntoView {
    view! {
        <div>
            <label for=id class="block text-sm font-medium text-gray-700">
                {label}
            </label>
            <input
                id=id
                name=id
                type=input_type.unwrap_or("text")
                autocomplete=autocomplete.unwrap_or("off")
                placeholder=placeholder.unwrap_or_default()
                class=move || input_class(error.with(Option::is_some))
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                disabled=move || disabled.get()
            />
            {move || {
                error
                    .get()
                    .map(|message| view! { <p class="mt-1 text-sm text-red-600">{message}</p> })
            }}
        </div>
    }
}

/// On/off switch with a label and description.
#[component]
pub fn Toggle(
    label: &'static str,
    description: &'static str,
    enabled: RwSignal<bool>,
) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between">
            <div>
                <p class="text-sm font-medium text-gray-900">{label}</p>
                <p class="text-sm text-gray-500">{description}</p>
            </div>
            <button
                type="button"
                role="switch"
                aria-checked=move || enabled.get().to_string()
                class="relative inline-flex h-6 w-11 shrink-0 cursor-pointer rounded-full transition-colors"
                class:bg-blue-600=move || enabled.get()
                class:bg-gray-200=move || !enabled.get()
                on:click=move |_| enabled.update(|value| *value = !*value)
            >
                <span class=move || {
                    let offset = if enabled.get() { "translate-x-5" } else { "translate-x-0" };
                    format!("inline-block h-5 w-5 mt-0.5 rounded-full bg-white shadow transition-transform {offset}")
                }></span>
            </button>
        </div>
    }
}
