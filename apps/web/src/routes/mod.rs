mod about;
mod confirm;
mod dashboard;
mod forgot_password;
mod form;
mod home;
mod login;
mod not_found;
mod profile;
mod reset_password;
mod settings;
mod signup;

pub(crate) use about::AboutPage;
pub(crate) use confirm::ConfirmPage;
pub(crate) use dashboard::DashboardPage;
pub(crate) use forgot_password::ForgotPasswordPage;
pub(crate) use home::HomePage;
pub(crate) use login::LoginPage;
pub(crate) use not_found::NotFoundPage;
pub(crate) use profile::ProfilePage;
pub(crate) use reset_password::ResetPasswordPage;
pub(crate) use settings::SettingsPage;
pub(crate) use signup::SignUpPage;

use leptos::prelude::*;
use leptos_router::components::{Route, Routes};
use leptos_router::path;

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <NotFoundPage /> }>
            <Route path=path!("/") view=HomePage />
            <Route path=path!("/about") view=AboutPage />
            <Route path=path!("/login") view=LoginPage />
            <Route path=path!("/signup") view=SignUpPage />
            <Route path=path!("/dashboard") view=DashboardPage />
            <Route path=path!("/profile") view=ProfilePage />
            <Route path=path!("/settings") view=SettingsPage />
            <Route path=path!("/auth/forgot-password") view=ForgotPasswordPage />
            <Route path=path!("/auth/reset-password") view=ResetPasswordPage />
            <Route path=path!("/auth/confirm") view=ConfirmPage />
            <Route path=path!("/*any") view=NotFoundPage />
        </Routes>
    }
}
