//! Connectivity tracking from the window's `online`/`offline` events.

use auth_state::network::NetworkStatus;
use leptos::{ev, prelude::*};

/// Tracks connectivity for the lifetime of the calling component.
pub fn use_network_status() -> ReadSignal<NetworkStatus> {
    let initial = window().navigator().on_line();
    let (status, set_status) = signal(NetworkStatus::new(initial));

    let online = window_event_listener(ev::online, move |_| {
        set_status.update(|status| *status = status.went_online());
    });
    let offline = window_event_listener(ev::offline, move |_| {
        set_status.update(|status| *status = status.went_offline());
    });
    on_cleanup(move || {
        online.remove();
        offline.remove();
    });

    status
}
