use crate::app_lib::{GIT_COMMIT_HASH, built_info};
use auth_state::routes::paths;
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="border-t border-gray-200 bg-white">
            <div class="max-w-screen-xl mx-auto flex flex-col gap-2 p-4 text-sm text-gray-500 md:flex-row md:items-center md:justify-between">
                <p>"© Trailhead. Built with Leptos and a hosted auth backend."</p>
                <div class="flex items-center gap-4">
                    <A href=paths::ABOUT {..} class="hover:text-gray-700">
                        "About"
                    </A>
                    <span class="font-mono text-xs" title="Build">
                        {format!("v{} ({})", built_info::PKG_VERSION, GIT_COMMIT_HASH)}
                    </span>
                </div>
            </div>
        </footer>
    }
}
