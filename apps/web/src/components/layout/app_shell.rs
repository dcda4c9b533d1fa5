//! Shared layout wrapper with header navigation, status banners, and footer.
//! It centralizes the header markup and the mobile menu toggle so routes can
//! focus on content. Navigation is client-side only; the auth API enforces
//! access on every call.

use crate::{
    app_lib::telemetry,
    components::layout::{EmailVerificationBanner, Footer, OfflineBanner},
    components::use_toasts,
    features::auth::use_auth,
};
use auth_state::{
    log::ErrorContext,
    routes::{header_links, paths},
};
use leptos::{ev, prelude::*};
use leptos_router::{components::A, hooks::use_navigate};

const LINK_CLASS: &str = "block py-2 px-3 text-gray-900 rounded hover:bg-gray-100 md:hover:bg-transparent md:border-0 md:hover:text-blue-700 md:p-0";
const BUTTON_CLASS: &str = "block py-2 px-3 rounded-md bg-blue-600 text-white hover:bg-blue-700 md:px-4";

/// Wraps routes with a header, banners, main content container, and footer.
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen flex flex-col bg-gray-50">
            <OfflineBanner />
            <Header />
            <EmailVerificationBanner />
            <main class="flex-1">{children()}</main>
            <Footer />
        </div>
    }
}

#[component]
fn Header() -> impl IntoView {
    let (menu_open, set_menu_open) = signal(false);
    let close_menu = move |_: ev::MouseEvent| set_menu_open.set(false);
    let auth = use_auth();
    let toasts = use_toasts();
    let navigate = use_navigate();

    let sign_out = Action::new_local(move |_: &()| {
        let navigate = navigate.clone();
        async move {
            match auth.sign_out().await {
                Ok(()) => navigate(paths::HOME, Default::default()),
                Err(err) => {
                    telemetry::log_error(
                        err.message(),
                        ErrorContext::component("Header", "sign_out"),
                    );
                    toasts.error("Sign out failed", err.message());
                }
            }
        }
    });

    let nav_links = move || {
        header_links(auth.is_authenticated.get())
            .iter()
            .map(|link| {
                view! {
                    <li>
                        <A href=link.href {..} class=LINK_CLASS on:click=close_menu>
                            {link.label}
                        </A>
                    </li>
                }
            })
            .collect_view()
    };

    let session_controls = move || {
        if auth.is_loading.get() && !auth.snapshot.with(|snapshot| snapshot.is_signing_out()) {
            view! {
                <li class="flex gap-2" aria-hidden="true">
                    <span class="h-8 w-16 animate-pulse rounded bg-gray-200"></span>
                    <span class="h-8 w-20 animate-pulse rounded bg-gray-200"></span>
                </li>
            }
            .into_any()
        } else if auth.is_authenticated.get() {
            view! {
                <li>
                    <button
                        type="button"
                        class=LINK_CLASS
                        disabled=move || sign_out.pending().get()
                        on:click=move |_| {
                            set_menu_open.set(false);
                            sign_out.dispatch(());
                        }
                    >
                        {move || if sign_out.pending().get() { "Signing out..." } else { "Sign Out" }}
                    </button>
                </li>
            }
            .into_any()
        } else {
            view! {
                <li>
                    <A href=paths::LOGIN {..} class=LINK_CLASS on:click=close_menu>
                        "Sign In"
                    </A>
                </li>
                <li>
                    <A href=paths::SIGNUP {..} class=BUTTON_CLASS on:click=close_menu>
                        "Sign Up"
                    </A>
                </li>
            }
            .into_any()
        }
    };

    view! {
        <header class="border-b border-gray-200 bg-white">
            <div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4">
                <A href=paths::HOME {..} class="flex items-center space-x-3" on:click=close_menu>
                    <span class="text-xl font-semibold whitespace-nowrap">"Trailhead"</span>
                </A>
                <button
                    type="button"
                    class="inline-flex items-center p-2 w-10 h-10 justify-center text-sm text-gray-500 rounded-lg md:hidden hover:bg-gray-100 focus:outline-none focus:ring-2 focus:ring-gray-200"
                    aria-controls="navbar-default"
                    aria-expanded=move || menu_open.get().to_string()
                    on:click=move |_| set_menu_open.update(|open| *open = !*open)
                >
                    <span class="sr-only">"Open main menu"</span>
                    <svg
                        class="w-5 h-5"
                        aria-hidden="true"
                        xmlns="http://www.w3.org/2000/svg"
                        fill="none"
                        viewBox="0 0 17 14"
                    >
                        <path
                            stroke="currentColor"
                            stroke-linecap="round"
                            stroke-linejoin="round"
                            stroke-width="2"
                            d="M1 1h15M1 7h15M1 13h15"
                        ></path>
                    </svg>
                </button>
                <div
                    id="navbar-default"
                    class="w-full md:block md:w-auto"
                    class:hidden=move || !menu_open.get()
                >
                    <ul class="font-medium flex flex-col p-4 md:p-0 mt-4 border border-gray-100 rounded-lg bg-gray-50 md:flex-row md:items-center md:space-x-8 md:mt-0 md:border-0 md:bg-white">
                        {nav_links}
                        {session_controls}
                    </ul>
                </div>
            </div>
        </header>
    }
}
