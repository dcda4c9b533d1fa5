//! Route policy: which paths need a session, which are only for anonymous
//! visitors, and how redirects carry the attempted path.

use url::{Url, form_urlencoded};

pub mod paths {
    pub const HOME: &str = "/";
    pub const ABOUT: &str = "/about";
    pub const LOGIN: &str = "/login";
    pub const SIGNUP: &str = "/signup";
    pub const DASHBOARD: &str = "/dashboard";
    pub const PROFILE: &str = "/profile";
    pub const SETTINGS: &str = "/settings";
    pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
    pub const RESET_PASSWORD: &str = "/auth/reset-password";
    pub const CONFIRM: &str = "/auth/confirm";
}

/// Query parameter naming the path to return to after signing in.
pub const REDIRECT_PARAM: &str = "redirectTo";

/// Stand-in origin for resolving redirect candidates.
const RESOLVE_BASE: &str = "http://localhost/";

const PROTECTED: &[&str] = &[paths::DASHBOARD, paths::PROFILE, paths::SETTINGS];
const AUTH_ONLY: &[&str] = &[paths::LOGIN, paths::SIGNUP, paths::FORGOT_PASSWORD];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Requires a signed-in user.
    Protected,
    /// Only for visitors without a session.
    AuthOnly,
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub fn access_for(path: &str) -> Access {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if PROTECTED.iter().any(|prefix| matches_prefix(path, prefix)) {
        Access::Protected
    } else if AUTH_ONLY.iter().any(|prefix| matches_prefix(path, prefix)) {
        Access::AuthOnly
    } else {
        Access::Public
    }
}

/// Login URL remembering where the visitor was headed.
pub fn login_redirect(from: &str) -> String {
    let from = sanitize_next(Some(from)).unwrap_or(paths::DASHBOARD);
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(REDIRECT_PARAM, from)
        .finish();
    format!("{}?{query}", paths::LOGIN)
}

/// Accepts only same-origin relative paths. URL parsers drop tabs and
/// newlines, so `/\t/host` would otherwise become `//host`.
pub fn sanitize_next(candidate: Option<&str>) -> Option<&str> {
    let candidate = candidate?.trim();
    if !candidate.starts_with('/')
        || candidate.starts_with("//")
        || candidate.contains('\\')
        || candidate.chars().any(|c| c.is_control() || c.is_whitespace())
    {
        return None;
    }
    let base = Url::parse(RESOLVE_BASE).ok()?;
    let resolved = base.join(candidate).ok()?;
    (resolved.origin() == base.origin()).then_some(candidate)
}

/// Where an authenticated visitor on an auth-only page should go.
pub fn post_login_target(redirect_to: Option<&str>) -> String {
    sanitize_next(redirect_to)
        .filter(|target| access_for(target) != Access::AuthOnly)
        .unwrap_or(paths::DASHBOARD)
        .to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

const AUTHENTICATED_LINKS: &[NavLink] = &[
    NavLink { label: "Dashboard", href: paths::DASHBOARD },
    NavLink { label: "Profile", href: paths::PROFILE },
    NavLink { label: "Settings", href: paths::SETTINGS },
    NavLink { label: "About", href: paths::ABOUT },
];

const ANONYMOUS_LINKS: &[NavLink] = &[
    NavLink { label: "Home", href: paths::HOME },
    NavLink { label: "About", href: paths::ABOUT },
];

pub fn header_links(authenticated: bool) -> &'static [NavLink] {
    if authenticated {
        AUTHENTICATED_LINKS
    } else {
        ANONYMOUS_LINKS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_paths_by_segment() {
        assert_eq!(access_for("/dashboard"), Access::Protected);
        assert_eq!(access_for("/settings/security"), Access::Protected);
        assert_eq!(access_for("/profile?tab=bio"), Access::Protected);
        assert_eq!(access_for("/dashboardx"), Access::Public);
        assert_eq!(access_for("/login"), Access::AuthOnly);
        assert_eq!(access_for("/auth/forgot-password"), Access::AuthOnly);
        assert_eq!(access_for("/auth/reset-password"), Access::Public);
        assert_eq!(access_for("/auth/confirm"), Access::Public);
        assert_eq!(access_for("/"), Access::Public);
    }

    #[test]
    fn login_redirect_encodes_origin() {
        assert_eq!(login_redirect("/profile"), "/login?redirectTo=%2Fprofile");
        assert_eq!(
            login_redirect("/settings?tab=a&b=c"),
            "/login?redirectTo=%2Fsettings%3Ftab%3Da%26b%3Dc"
        );
    }

    #[test]
    fn rejects_offsite_targets() {
        assert_eq!(post_login_target(Some("/profile")), "/profile");
        assert_eq!(post_login_target(Some("//evil.example")), "/dashboard");
        assert_eq!(post_login_target(Some("https://evil.example")), "/dashboard");
        assert_eq!(post_login_target(Some("/\\evil.example")), "/dashboard");
        assert_eq!(post_login_target(Some("/\t/evil.example/phish")), "/dashboard");
        assert_eq!(post_login_target(Some("/\n/evil.example")), "/dashboard");
        assert_eq!(post_login_target(Some("/\r/evil.example")), "/dashboard");
        assert_eq!(post_login_target(Some("/%09/evil.example")), "/%09/evil.example");
        assert_eq!(post_login_target(Some("/login")), "/dashboard");
        assert_eq!(post_login_target(None), "/dashboard");
    }

    #[test]
    fn accepted_targets_stay_on_origin() {
        let base = Url::parse("https://app.trailhead.dev/login").unwrap();
        for candidate in [
            "/settings?tab=a&b=c",
            "/\t/evil.example",
            "/\u{0}/evil.example",
            "/ /evil.example",
            "/./\n/evil.example",
        ] {
            let target = post_login_target(Some(candidate));
            let resolved = base.join(&target).unwrap();
            assert_eq!(resolved.host_str(), Some("app.trailhead.dev"), "{candidate:?}");
        }
    }

    #[test]
    fn login_redirect_drops_unsafe_origin() {
        assert_eq!(login_redirect("/\t/evil.example"), "/login?redirectTo=%2Fdashboard");
    }

    #[test]
    fn header_links_depend_on_session() {
        let labels: Vec<_> = header_links(true).iter().map(|link| link.label).collect();
        assert_eq!(labels, ["Dashboard", "Profile", "Settings", "About"]);
        assert_eq!(header_links(false).len(), 2);
    }
}
