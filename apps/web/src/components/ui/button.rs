use leptos::prelude::*;

const PRIMARY: &str = "inline-flex items-center justify-center rounded-md bg-blue-600 px-4 py-2 text-sm font-medium text-white shadow-sm transition-colors hover:bg-blue-700 focus:outline-none focus:ring-2 focus:ring-blue-500 focus:ring-offset-2";

/// Primary action button. Disabled while its form is in flight.
#[component]
pub fn Button(
    #[prop(optional)] button_type: Option<&'static str>,
    #[prop(optional, into, default = Signal::from(false))] disabled: Signal<bool>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            type=button_type.unwrap_or("button")
            class=move || {
                if disabled.get() {
                    format!("{PRIMARY} cursor-not-allowed opacity-60")
                } else {
                    PRIMARY.to_string()
                }
            }
            disabled=move || disabled.get()
        >
            {children()}
        </button>
    }
}
