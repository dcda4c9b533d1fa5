//! Auth-change event stream. Provider clients own an [`AuthEventBus`] and emit
//! on every session change; the session controller subscribes to it. The bus
//! is single-threaded (browser event loop) and tolerates listeners that
//! subscribe or unsubscribe while an event is being delivered.

use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

impl AuthChangeEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialSession => "INITIAL_SESSION",
            Self::SignedIn => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::TokenRefreshed => "TOKEN_REFRESHED",
            Self::UserUpdated => "USER_UPDATED",
            Self::PasswordRecovery => "PASSWORD_RECOVERY",
        }
    }
}

impl fmt::Display for AuthChangeEvent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

type Listener = Rc<dyn Fn(AuthChangeEvent, Option<&Session>)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Fan-out of auth events to every live subscription.
#[derive(Clone, Default)]
pub struct AuthEventBus {
    registry: Rc<RefCell<Registry>>,
}

impl AuthEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener until the returned handle is dropped.
    pub fn subscribe(
        &self,
        listener: impl Fn(AuthChangeEvent, Option<&Session>) + 'static,
    ) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Rc::new(listener)));

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Delivers an event to a snapshot of the current listeners.
    pub fn emit(&self, event: AuthChangeEvent, session: Option<&Session>) {
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        debug!(
            event = %event,
            listeners = listeners.len(),
            has_session = session.is_some(),
            "auth event"
        );

        for listener in listeners {
            listener(event, session);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Live registration on an [`AuthEventBus`]; dropping it unsubscribes.
#[must_use = "dropping a subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Subscription")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthChangeEvent, AuthEventBus};
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn delivers_to_all_listeners_until_unsubscribed() {
        let bus = AuthEventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event, _| seen.borrow_mut().push(("first", event)))
        };
        let _second = {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event, _| seen.borrow_mut().push(("second", event)))
        };

        bus.emit(AuthChangeEvent::SignedIn, None);
        first.unsubscribe();
        bus.emit(AuthChangeEvent::SignedOut, None);

        assert_eq!(
            *seen.borrow(),
            vec![
                ("first", AuthChangeEvent::SignedIn),
                ("second", AuthChangeEvent::SignedIn),
                ("second", AuthChangeEvent::SignedOut),
            ]
        );
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn listener_may_drop_its_own_subscription_during_delivery() {
        let bus = AuthEventBus::new();
        let slot = Rc::new(RefCell::new(None));
        let calls = Rc::new(RefCell::new(0));

        let subscription = {
            let slot = Rc::clone(&slot);
            let calls = Rc::clone(&calls);
            bus.subscribe(move |_, _| {
                *calls.borrow_mut() += 1;
                slot.borrow_mut().take();
            })
        };
        *slot.borrow_mut() = Some(subscription);

        bus.emit(AuthChangeEvent::TokenRefreshed, None);
        bus.emit(AuthChangeEvent::TokenRefreshed, None);

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn event_names_match_the_wire_format() {
        let json = serde_json::to_string(&AuthChangeEvent::PasswordRecovery).unwrap();
        assert_eq!(json, "\"PASSWORD_RECOVERY\"");
        assert_eq!(AuthChangeEvent::SignedIn.to_string(), "SIGNED_IN");
    }
}
