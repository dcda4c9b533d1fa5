use leptos::prelude::*;

/// Inline activity indicator. `label` is announced to screen readers.
#[component]
pub fn Spinner(#[prop(optional)] label: Option<&'static str>) -> impl IntoView {
    view! {
        <span
            class="inline-block h-5 w-5 animate-spin rounded-full border-2 border-blue-200 border-t-blue-600"
            role="status"
            aria-live="polite"
            aria-label=label.unwrap_or("Loading")
        ></span>
    }
}

/// Centered spinner used while a guard decision or link check is pending.
#[component]
pub fn FullPageSpinner() -> impl IntoView {
    view! {
        <div class="flex min-h-[40vh] items-center justify-center">
            <Spinner label="Checking your session" />
        </div>
    }
}
