//! In-memory client error log.
//!
//! A bounded ring of recent failures and user actions, kept for support
//! diagnostics. Every entry is mirrored to `tracing` so it also reaches the
//! browser console.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use tracing::{error, info, warn};

pub const MAX_ENTRIES: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub additional_data: Map<String, Value>,
}

impl ErrorContext {
    pub fn component(component: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            component: Some(component.into()),
            action: Some(action.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_data.insert(key.into(), value.into());
        self
    }
}

/// Where and when an entry was recorded; supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogOrigin {
    pub timestamp: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogEntry {
    pub id: String,
    pub message: String,
    pub level: LogLevel,
    pub timestamp: String,
    pub url: String,
    pub context: ErrorContext,
}

#[derive(Debug, Default)]
pub struct ErrorLog {
    sequence: u64,
    entries: VecDeque<LogEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, evicting the oldest beyond [`MAX_ENTRIES`].
    pub fn record(
        &mut self,
        origin: LogOrigin,
        level: LogLevel,
        message: impl Into<String>,
        context: ErrorContext,
    ) -> String {
        self.sequence += 1;
        let message = message.into();
        let id = format!("{:08x}", self.sequence);

        let component = context.component.as_deref().unwrap_or("app");
        let action = context.action.as_deref().unwrap_or_default();
        match level {
            LogLevel::Error => error!(%id, component, action, "{message}"),
            LogLevel::Warning => warn!(%id, component, action, "{message}"),
            LogLevel::Info => info!(%id, component, action, "{message}"),
        }

        self.entries.push_back(LogEntry {
            id: id.clone(),
            message,
            level,
            timestamp: origin.timestamp,
            url: origin.url,
            context,
        });
        while self.entries.len() > MAX_ENTRIES {
            self.entries.pop_front();
        }
        id
    }

    pub fn api_error(
        &mut self,
        origin: LogOrigin,
        endpoint: &str,
        status: u16,
        response: &str,
        context: ErrorContext,
    ) -> String {
        let context = context
            .with_data("endpoint", endpoint)
            .with_data("status", status)
            .with_data("response", response);
        self.record(
            origin,
            LogLevel::Error,
            format!("API Error: {endpoint} returned {status}"),
            context,
        )
    }

    pub fn user_action(
        &mut self,
        origin: LogOrigin,
        action: &str,
        data: Map<String, Value>,
        context: ErrorContext,
    ) -> String {
        let context = ErrorContext {
            action: Some(action.to_string()),
            additional_data: data,
            ..context
        };
        self.record(
            origin,
            LogLevel::Info,
            format!("User Action: {action}"),
            context,
        )
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn origin() -> LogOrigin {
        LogOrigin {
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            url: "http://localhost/login".to_string(),
        }
    }

    #[test]
    fn keeps_only_the_newest_entries() {
        let mut log = ErrorLog::new();
        for index in 0..(MAX_ENTRIES + 5) {
            log.record(origin(), LogLevel::Error, format!("e{index}"), ErrorContext::default());
        }
        assert_eq!(log.len(), MAX_ENTRIES);
        assert_eq!(log.entries().next().map(|entry| entry.message.as_str()), Some("e5"));
    }

    #[test]
    fn api_errors_carry_endpoint_details() {
        let mut log = ErrorLog::new();
        log.api_error(origin(), "/auth/v1/token", 400, "bad", ErrorContext::default());
        let entry = log.entries().next().cloned().unwrap();
        assert_eq!(entry.message, "API Error: /auth/v1/token returned 400");
        assert_eq!(entry.context.additional_data["status"], json!(400));
        assert_eq!(entry.level, LogLevel::Error);
    }

    #[test]
    fn user_actions_are_info_level() {
        let mut log = ErrorLog::new();
        let mut data = Map::new();
        data.insert("userId".into(), json!("u1"));
        let id = log.user_action(origin(), "Signup successful", data, ErrorContext::default());
        let entry = log.entries().last().cloned().unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.context.action.as_deref(), Some("Signup successful"));
        assert_eq!(entry.url, "http://localhost/login");
    }

    #[test]
    fn entries_serialize_for_export() {
        let mut log = ErrorLog::new();
        log.record(
            origin(),
            LogLevel::Warning,
            "slow",
            ErrorContext::component("Header", "sign_out").with_user("u1"),
        );
        let value = serde_json::to_value(log.entries().next().unwrap()).unwrap();
        assert_eq!(value["level"], json!("warning"));
        assert_eq!(value["context"]["userId"], json!("u1"));
        assert!(value["context"].get("additionalData").is_none());
    }
}
