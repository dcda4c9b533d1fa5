//! Toast notifications with auto-dismiss. Messages must be safe to render and
//! never include secrets or tokens.

use auth_state::notice::{TOAST_TIMEOUT_MS, Toast, ToastLevel, ToastQueue, ToastSpec};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct Toasts {
    queue: RwSignal<ToastQueue>,
}

impl Toasts {
    pub fn push(&self, spec: ToastSpec) {
        let Some(id) = self.queue.try_update(|queue| queue.push(spec)) else {
            return;
        };
        let queue = self.queue;
        set_timeout(
            move || {
                queue.try_update(|queue| queue.dismiss(id));
            },
            std::time::Duration::from_millis(u64::from(TOAST_TIMEOUT_MS)),
        );
    }

    pub fn success(&self, title: &str, message: &str) {
        self.push(ToastSpec::success(title, message));
    }

    pub fn error(&self, title: &str, message: &str) {
        self.push(ToastSpec::error(title, message));
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.update(|queue| {
            queue.dismiss(id);
        });
    }
}

/// Provides the toast queue and renders the stack in the corner.
#[component]
pub fn ToastProvider(children: Children) -> impl IntoView {
    let toasts = Toasts {
        queue: RwSignal::new(ToastQueue::new()),
    };
    provide_context(toasts);

    view! {
        {children()}
        <div class="fixed top-4 right-4 z-50 flex w-full max-w-sm flex-col gap-2" aria-live="polite">
            <For
                each=move || toasts.queue.with(|queue| queue.iter().cloned().collect::<Vec<_>>())
                key=|toast| toast.id
                let:toast
            >
                <ToastCard toast=toast toasts=toasts />
            </For>
        </div>
    }
}

#[component]
fn ToastCard(toast: Toast, toasts: Toasts) -> impl IntoView {
    let class = match toast.spec.level {
        ToastLevel::Success => "border-emerald-200 bg-emerald-50 text-emerald-800",
        ToastLevel::Error => "border-red-200 bg-red-50 text-red-800",
        ToastLevel::Info => "border-blue-200 bg-blue-50 text-blue-800",
    };
    let id = toast.id;

    view! {
        <div class=format!("rounded-lg border px-4 py-3 shadow-md {class}") role="status">
            <div class="flex items-start justify-between gap-3">
                <div>
                    <p class="text-sm font-semibold">{toast.spec.title}</p>
                    <p class="mt-1 text-sm">{toast.spec.message}</p>
                </div>
                <button
                    type="button"
                    class="text-sm opacity-60 hover:opacity-100"
                    aria-label="Dismiss"
                    on:click=move |_| toasts.dismiss(id)
                >
                    "×"
                </button>
            </div>
        </div>
    }
}

/// Returns the toast context. Outside a provider, toasts are queued but
/// never shown.
pub fn use_toasts() -> Toasts {
    use_context::<Toasts>().unwrap_or_else(|| Toasts {
        queue: RwSignal::new(ToastQueue::new()),
    })
}
