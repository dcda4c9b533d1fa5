//! Shared frontend utilities for API access, configuration, errors, logging,
//! and build metadata.
//!
//! ## Core Authentication Flows
//!
//! ### Signup & Email Verification
//!
//! 1. **Signup:** The client POSTs `/auth/v1/signup` with `email_redirect_to`
//!    pointing at `/auth/confirm`. Projects without confirmation answer with a
//!    session right away.
//! 2. **Confirm:** The emailed link carries `token_hash` and `type`; the confirm
//!    page POSTs them to `/auth/v1/verify`, which returns a session.
//!
//! ### Password Recovery
//!
//! 1. **Request:** `/auth/v1/recover?redirect_to=<site>/auth/reset-password`.
//! 2. **Reset:** The link signs the user in (token hash or fragment tokens) and
//!    the page sends the new password with `PUT /auth/v1/user`.
//!
//! Configuration values are public. Access and refresh tokens only travel in
//! request headers and local storage; callers must never log them.

#[cfg(target_arch = "wasm32")]
pub(crate) mod api;
#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub(crate) mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
pub(crate) mod config;
#[cfg(target_arch = "wasm32")]
pub(crate) mod download;
pub(crate) mod errors;
#[cfg(target_arch = "wasm32")]
pub(crate) mod telemetry;

pub(crate) const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH_SHORT {
    Some(hash) => hash,
    None => "unknown",
};

pub(crate) use config::AppConfig;
pub(crate) use errors::AppError;
