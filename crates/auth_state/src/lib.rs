//! Auth state for the Trailhead web app, independent of the browser.
//!
//! The web crate renders; this crate decides. It owns the session snapshot
//! and its reducer, the provider client trait, route guard decisions, the
//! error taxonomy and the copy shown for each failure, so all of it can be
//! tested natively.

pub mod client;
pub mod error;
pub mod events;
pub mod flows;
pub mod guard;
pub mod log;
pub mod network;
pub mod notice;
pub mod persist;
pub mod profile;
pub mod routes;
pub mod session;
pub mod validation;

pub use client::{AuthClient, PasswordCredentials, SignUpOutcome, UserAttributes};
pub use error::{AuthError, AuthErrorKind};
pub use events::{AuthChangeEvent, AuthEventBus, Subscription};
pub use guard::{GuardOutcome, GuardView, RedirectLatch, evaluate};
pub use persist::{MemoryStorage, SessionKeeper, SessionStorage};
pub use routes::Access;
pub use session::{AuthSnapshot, Session, SessionController, SessionState, SessionStore, User};
