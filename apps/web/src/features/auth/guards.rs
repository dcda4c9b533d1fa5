//! Route guard. The wrapper looks up the current path in the route policy
//! table, renders a spinner unless the decision is to show children, and fires
//! at most one client-side redirect per decision. This is a UX guard only; the
//! auth API enforces access on every call.

use crate::{components::FullPageSpinner, features::auth::state::use_auth};
use auth_state::{
    guard::{self, GuardView, RedirectLatch},
    routes::{REDIRECT_PARAM, access_for},
};
use leptos::prelude::*;
use leptos_router::{
    NavigateOptions,
    hooks::{use_location, use_navigate},
};

/// Gates children by [`access_for`] the current path: protected pages need a
/// session, auth-only pages send signed-in users to the post-login target.
#[component]
pub fn RouteGuard(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let navigate = use_navigate();

    let outcome = Memo::new(move |_| {
        let pathname = location.pathname.get();
        let access = access_for(&pathname);
        let search = location.search.get();
        let path = match search.trim_start_matches('?') {
            "" => pathname,
            query => format!("{pathname}?{query}"),
        };
        let redirect_to = location.query.with(|query| query.get(REDIRECT_PARAM));
        auth.snapshot
            .with(|snapshot| guard::evaluate(access, snapshot, &path, redirect_to.as_deref()))
    });

    let latch = StoredValue::new_local(RedirectLatch::new());
    Effect::new(move |_| {
        let outcome = outcome.get();
        let target = latch
            .try_update_value(|latch| latch.observe(&outcome))
            .flatten();
        if let Some(target) = target {
            navigate(
                &target,
                NavigateOptions {
                    replace: true,
                    ..NavigateOptions::default()
                },
            );
        }
    });

    move || match outcome.with(|outcome| outcome.view) {
        GuardView::Children => children().into_any(),
        GuardView::Spinner => view! { <FullPageSpinner /> }.into_any(),
    }
}
