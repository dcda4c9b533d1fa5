//! Guard decisions for protected and auth-only routes.
//!
//! The spinner is the default whenever the decision is not "render children",
//! so a pending redirect never flashes stale content.

use crate::{
    routes::{self, Access},
    session::AuthSnapshot,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardView {
    Spinner,
    Children,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardOutcome {
    pub view: GuardView,
    pub redirect: Option<String>,
}

impl GuardOutcome {
    fn children() -> Self {
        Self {
            view: GuardView::Children,
            redirect: None,
        }
    }

    fn spinner(redirect: Option<String>) -> Self {
        Self {
            view: GuardView::Spinner,
            redirect,
        }
    }

    pub fn renders_children(&self) -> bool {
        self.view == GuardView::Children
    }
}

/// Decides what a guarded route shows for the current snapshot.
///
/// `path` is the attempted location (path plus query) and `redirect_to` the
/// current `redirectTo` query value, if any.
pub fn evaluate(
    access: Access,
    snapshot: &AuthSnapshot,
    path: &str,
    redirect_to: Option<&str>,
) -> GuardOutcome {
    match access {
        Access::Public => GuardOutcome::children(),
        _ if snapshot.is_loading() => GuardOutcome::spinner(None),
        Access::Protected if snapshot.is_authenticated() => GuardOutcome::children(),
        Access::Protected => GuardOutcome::spinner(Some(routes::login_redirect(path))),
        Access::AuthOnly if snapshot.is_authenticated() => {
            GuardOutcome::spinner(Some(routes::post_login_target(redirect_to)))
        }
        Access::AuthOnly => GuardOutcome::children(),
    }
}

/// Fires each redirect target once until the guard decision changes.
#[derive(Debug, Default)]
pub struct RedirectLatch {
    fired: Option<String>,
}

impl RedirectLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the target to navigate to, or `None` if it already fired.
    pub fn observe(&mut self, outcome: &GuardOutcome) -> Option<String> {
        match &outcome.redirect {
            None => {
                self.fired = None;
                None
            }
            Some(target) if self.fired.as_deref() == Some(target.as_str()) => None,
            Some(target) => {
                self.fired = Some(target.clone());
                Some(target.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::sample_session;

    #[test]
    fn protected_shows_spinner_while_loading() {
        let outcome = evaluate(Access::Protected, &AuthSnapshot::loading(), "/dashboard", None);
        assert_eq!(outcome, GuardOutcome::spinner(None));
    }

    #[test]
    fn protected_redirects_anonymous_visitors() {
        let outcome = evaluate(
            Access::Protected,
            &AuthSnapshot::unauthenticated(),
            "/profile",
            None,
        );
        assert!(!outcome.renders_children());
        assert_eq!(outcome.redirect.as_deref(), Some("/login?redirectTo=%2Fprofile"));
    }

    #[test]
    fn protected_renders_for_users() {
        let snapshot = AuthSnapshot::authenticated(sample_session());
        let outcome = evaluate(Access::Protected, &snapshot, "/dashboard", None);
        assert!(outcome.renders_children());
        assert!(outcome.redirect.is_none());
    }

    #[test]
    fn auth_only_is_inverted() {
        let snapshot = AuthSnapshot::authenticated(sample_session());
        let outcome = evaluate(Access::AuthOnly, &snapshot, "/login", Some("/settings"));
        assert!(!outcome.renders_children());
        assert_eq!(outcome.redirect.as_deref(), Some("/settings"));

        let anonymous = evaluate(Access::AuthOnly, &AuthSnapshot::unauthenticated(), "/login", None);
        assert!(anonymous.renders_children());
    }

    #[test]
    fn public_routes_always_render() {
        let outcome = evaluate(Access::Public, &AuthSnapshot::loading(), "/about", None);
        assert!(outcome.renders_children());
    }

    #[test]
    fn route_table_drives_each_page() {
        use crate::routes::{access_for, paths};

        let anonymous = AuthSnapshot::unauthenticated();
        let signed_in = AuthSnapshot::authenticated(sample_session());
        let decide = |path: &str, snapshot: &AuthSnapshot| {
            evaluate(access_for(path), snapshot, path, None)
        };

        for path in [paths::DASHBOARD, paths::PROFILE, paths::SETTINGS] {
            assert!(!decide(path, &anonymous).renders_children(), "{path}");
            assert!(decide(path, &signed_in).renders_children(), "{path}");
        }
        for path in [paths::LOGIN, paths::SIGNUP, paths::FORGOT_PASSWORD] {
            assert!(decide(path, &anonymous).renders_children(), "{path}");
            assert_eq!(decide(path, &signed_in).redirect.as_deref(), Some(paths::DASHBOARD));
        }
        for path in [paths::RESET_PASSWORD, paths::CONFIRM, paths::ABOUT] {
            assert!(decide(path, &anonymous).renders_children(), "{path}");
            assert!(decide(path, &signed_in).renders_children(), "{path}");
        }
    }

    #[test]
    fn latch_fires_once_per_transition() {
        let mut latch = RedirectLatch::new();
        let pending = GuardOutcome::spinner(Some("/login".to_string()));
        assert_eq!(latch.observe(&pending).as_deref(), Some("/login"));
        assert_eq!(latch.observe(&pending), None);

        latch.observe(&GuardOutcome::children());
        assert_eq!(latch.observe(&pending).as_deref(), Some("/login"));
    }
}
