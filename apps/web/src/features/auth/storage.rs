//! Session persistence in `localStorage`, keyed per project so several apps on
//! one origin do not collide.

use auth_state::{Session, SessionStorage};
use tracing::warn;
use web_sys::Storage;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub struct LocalSessionStorage {
    key: String,
}

impl LocalSessionStorage {
    pub fn new(key: String) -> Self {
        Self { key }
    }
}

impl SessionStorage for LocalSessionStorage {
    fn load(&self) -> Option<Session> {
        let raw = local_storage()?.get_item(&self.key).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(error = %err, "discarding unreadable stored session");
                self.remove();
                None
            }
        }
    }

    fn save(&self, session: &Session) {
        let Some(storage) = local_storage() else {
            return;
        };
        match serde_json::to_string(session) {
            Ok(raw) => {
                if storage.set_item(&self.key, &raw).is_err() {
                    warn!("failed to persist session");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode session"),
        }
    }

    fn remove(&self) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(&self.key);
        }
    }
}
