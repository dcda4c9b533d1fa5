//! Public landing page.

use crate::components::layout::AppShell;
use crate::features::auth::use_auth;
use auth_state::routes::paths;
use leptos::prelude::*;
use leptos_router::components::A;

static FEATURES: [(&str, &str); 3] = [
    (
        "Secure Authentication",
        "Registration, sign in, password recovery, and email verification against a hosted auth service, with sessions that survive reloads.",
    ),
    (
        "Interactive Dashboard",
        "A protected area with profile management and settings, ready to grow into your application's main experience.",
    ),
    (
        "Modern Tech Stack",
        "Rust compiled to WebAssembly with Leptos and Tailwind CSS. Type-checked from the route table down to the API payloads.",
    ),
];

static STACK: [(&str, &str, &str); 4] = [
    ("Rs", "Rust", "Type Safety"),
    ("L", "Leptos", "Reactive UI"),
    ("TW", "Tailwind CSS", "Styling"),
    ("SB", "Supabase", "Backend & Auth"),
];

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let primary = move || {
        if auth.is_authenticated.get() {
            (paths::DASHBOARD, "Go to Dashboard")
        } else {
            (paths::SIGNUP, "Get Started Free")
        }
    };

    view! {
        <AppShell>
            <section class="bg-gradient-to-br from-blue-50 to-indigo-100 px-4 py-20 sm:px-6 lg:px-8">
                <div class="max-w-7xl mx-auto text-center">
                    <h1 class="mb-6 text-4xl font-bold text-gray-900 md:text-6xl">
                        "Modern Web" <span class="text-blue-600">" Template"</span>
                    </h1>
                    <p class="mx-auto mb-8 max-w-3xl text-xl text-gray-600 md:text-2xl">
                        "A production-ready foundation with secure authentication, responsive design, and modern development practices included."
                    </p>
                    <div class="flex flex-col justify-center gap-4 sm:flex-row">
                        {move || {
                            let (href, label) = primary();
                            view! {
                                <A
                                    href=href
                                    {..}
                                    class="rounded-lg bg-blue-600 px-8 py-4 text-lg font-semibold text-white shadow-lg transition-colors hover:bg-blue-700"
                                >
                                    {label}
                                </A>
                            }
                        }}
                        <A
                            href=paths::ABOUT
                            {..}
                            class="rounded-lg border border-gray-300 bg-white px-8 py-4 text-lg font-semibold text-gray-900 shadow-sm transition-colors hover:bg-gray-50"
                        >
                            "Learn More"
                        </A>
                    </div>
                </div>
            </section>

            <section class="bg-white px-4 py-20 sm:px-6 lg:px-8">
                <div class="max-w-7xl mx-auto">
                    <div class="mb-16 text-center">
                        <h2 class="mb-4 text-3xl font-bold text-gray-900 md:text-4xl">
                            "Everything You Need to Start Building"
                        </h2>
                        <p class="mx-auto max-w-2xl text-xl text-gray-600">
                            "A comprehensive template with modern tools and best practices for rapid development."
                        </p>
                    </div>
                    <div class="grid grid-cols-1 gap-8 md:grid-cols-3">
                        {FEATURES
                            .iter()
                            .map(|&(title, body)| {
                                view! {
                                    <div class="rounded-xl border border-gray-100 bg-white p-8 shadow-lg transition-shadow hover:shadow-xl">
                                        <h3 class="mb-4 text-xl font-semibold text-gray-900">{title}</h3>
                                        <p class="text-gray-600">{body}</p>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            </section>

            <section class="bg-gray-50 px-4 py-20 sm:px-6 lg:px-8">
                <div class="max-w-7xl mx-auto">
                    <div class="mb-16 text-center">
                        <h2 class="mb-4 text-3xl font-bold text-gray-900 md:text-4xl">
                            "Built with Industry Standards"
                        </h2>
                        <p class="text-xl text-gray-600">
                            "Modern technologies for performance, scalability, and developer experience."
                        </p>
                    </div>
                    <div class="grid grid-cols-2 gap-8 md:grid-cols-4">
                        {STACK
                            .iter()
                            .map(|&(badge, name, role)| {
                                view! {
                                    <div class="text-center">
                                        <div class="mx-auto mb-4 flex h-16 w-16 items-center justify-center rounded-lg bg-white shadow-sm">
                                            <span class="text-2xl font-bold text-blue-600">{badge}</span>
                                        </div>
                                        <h3 class="font-semibold text-gray-900">{name}</h3>
                                        <p class="text-sm text-gray-600">{role}</p>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            </section>
        </AppShell>
    }
}
