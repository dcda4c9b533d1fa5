/// Browser connectivity as seen through `online`/`offline` events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkStatus {
    pub is_online: bool,
    /// Set when coming back online, so the UI can say so.
    pub was_offline: bool,
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NetworkStatus {
    pub fn new(is_online: bool) -> Self {
        Self {
            is_online,
            was_offline: false,
        }
    }

    #[must_use]
    pub fn went_online(self) -> Self {
        Self {
            is_online: true,
            was_offline: !self.is_online,
        }
    }

    #[must_use]
    pub fn went_offline(self) -> Self {
        Self {
            is_online: false,
            ..self
        }
    }

    pub fn show_offline_banner(&self) -> bool {
        !self.is_online
    }

    pub fn show_reconnected_banner(&self) -> bool {
        self.is_online && self.was_offline
    }
}

#[cfg(test)]
mod tests {
    use super::NetworkStatus;

    #[test]
    fn remembers_outage_after_reconnect() {
        let status = NetworkStatus::new(true).went_offline();
        assert!(status.show_offline_banner());

        let status = status.went_online();
        assert!(status.show_reconnected_banner());

        let status = status.went_online();
        assert!(!status.was_offline);
    }
}
