use crate::components::ToastProvider;
use crate::features::auth::AuthProvider;
use crate::routes::AppRoutes;
use leptos::prelude::*;
use leptos_router::components::Router;

/// Root component. Toasts sit outside the auth provider so session events
/// raised during mount can already surface notifications.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <ToastProvider>
            <AuthProvider>
                <Router>
                    <AppRoutes />
                </Router>
            </AuthProvider>
        </ToastProvider>
    }
}
