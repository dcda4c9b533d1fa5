use crate::components::layout::AppShell;
use auth_state::routes::paths;
use leptos::prelude::*;
use leptos_router::components::A;

static HIGHLIGHTS: [(&str, [&str; 4]); 4] = [
    (
        "Secure Authentication",
        [
            "Email/password authentication",
            "Session persistence and refresh",
            "Protected and auth-only route guards",
            "User metadata and profile management",
        ],
    ),
    (
        "Interactive Dashboard",
        [
            "Business metrics and analytics cards",
            "User profile and settings management",
            "Responsive grid layouts",
            "Activity feed",
        ],
    ),
    (
        "Developer Experience",
        [
            "Strict clippy lints across the workspace",
            "Auth state logic tested natively",
            "Hot reload with trunk serve",
            "Component-based architecture",
        ],
    ),
    (
        "Production Ready",
        [
            "Static bundle for any CDN",
            "Build version and commit in the footer",
            "Offline detection and client error log",
            "Tokens kept out of logs",
        ],
    ),
];

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <AppShell>
            <div class="max-w-5xl mx-auto px-4 py-12 sm:px-6 lg:px-8">
                <div class="mb-12 text-center">
                    <h1 class="mb-4 text-4xl font-bold text-gray-900">"About Trailhead"</h1>
                    <p class="mx-auto max-w-3xl text-xl text-gray-600">
                        "A starter for browser applications that need accounts from day one."
                    </p>
                </div>

                <section class="mb-12 rounded-lg bg-white p-8 shadow">
                    <h2 class="mb-4 text-2xl font-semibold text-gray-900">"Our Mission"</h2>
                    <p class="text-gray-600">
                        "Skip the weeks spent wiring up sign in, password resets, and email verification. Trailhead ships those flows working against a hosted auth service so you can start on the part of the product that is actually yours."
                    </p>
                </section>

                <div class="mb-12 grid grid-cols-1 gap-8 md:grid-cols-2">
                    {HIGHLIGHTS
                        .iter()
                        .map(|(title, points)| {
                            view! {
                                <section class="rounded-lg bg-white p-6 shadow">
                                    <h3 class="mb-3 text-lg font-semibold text-gray-900">{*title}</h3>
                                    <ul class="space-y-1 text-sm text-gray-600">
                                        {points
                                            .iter()
                                            .map(|&point| view! { <li>"• " {point}</li> })
                                            .collect_view()}
                                    </ul>
                                </section>
                            }
                        })
                        .collect_view()}
                </div>

                <div class="text-center">
                    <h2 class="mb-4 text-2xl font-semibold text-gray-900">"Ready to Get Started?"</h2>
                    <A
                        href=paths::SIGNUP
                        {..}
                        class="inline-block rounded-lg bg-blue-600 px-8 py-3 font-semibold text-white hover:bg-blue-700"
                    >
                        "Create an account"
                    </A>
                </div>
            </div>
        </AppShell>
    }
}
