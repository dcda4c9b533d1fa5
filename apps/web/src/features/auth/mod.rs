//! Auth feature module covering the hosted auth client, session context, and
//! route guards. It keeps authentication logic out of the UI. This module
//! touches security boundaries and must avoid logging passwords or token
//! material.
//!
//! Flow Overview: the provider subscribes to client events and resolves the
//! stored session once. Sign-in, signup confirmation, and recovery links all
//! install a session through the client, which emits an event; the context
//! picks it up and guards react.

pub(crate) mod client;
mod guards;
pub(crate) mod state;
mod storage;
mod types;

pub(crate) use guards::RouteGuard;
pub(crate) use state::{AuthProvider, use_auth};
