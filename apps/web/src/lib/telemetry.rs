//! Browser logging setup and the page-lifetime error log.

use super::config::AppConfig;
use auth_state::log::{ErrorContext, ErrorLog, LogLevel, LogOrigin};
use serde_json::{Map, Value};
use std::cell::RefCell;

thread_local! {
    static ERROR_LOG: RefCell<ErrorLog> = RefCell::new(ErrorLog::new());
}

/// Installs the panic hook and the console tracing subscriber.
pub fn init(config: &AppConfig) {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(config.max_log_level())
            .build(),
    );
}

fn origin() -> LogOrigin {
    let timestamp: String = js_sys::Date::new_0().to_iso_string().into();
    let url = web_sys::window()
        .and_then(|window| window.location().href().ok())
        .unwrap_or_default();
    LogOrigin { timestamp, url }
}

pub fn log_error(message: impl Into<String>, context: ErrorContext) -> String {
    ERROR_LOG.with(|log| {
        log.borrow_mut()
            .record(origin(), LogLevel::Error, message, context)
    })
}

pub fn log_warning(message: impl Into<String>, context: ErrorContext) -> String {
    ERROR_LOG.with(|log| {
        log.borrow_mut()
            .record(origin(), LogLevel::Warning, message, context)
    })
}

pub fn log_api_error(endpoint: &str, status: u16, response: &str, context: ErrorContext) -> String {
    ERROR_LOG.with(|log| {
        log.borrow_mut()
            .api_error(origin(), endpoint, status, response, context)
    })
}

pub fn log_user_action(action: &str, data: Map<String, Value>) -> String {
    ERROR_LOG.with(|log| {
        log.borrow_mut()
            .user_action(origin(), action, data, ErrorContext::default())
    })
}

/// Serialized log entries, newest last, for support exports.
pub fn export_log() -> Value {
    ERROR_LOG.with(|log| {
        let log = log.borrow();
        serde_json::to_value(log.entries().collect::<Vec<_>>()).unwrap_or(Value::Null)
    })
}
