//! Layout components shared across routes.

mod app_shell;
mod banners;
mod footer;

pub(crate) use app_shell::AppShell;
pub(crate) use banners::{EmailVerificationBanner, OfflineBanner};
pub(crate) use footer::Footer;
