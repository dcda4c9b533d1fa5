//! Build-time configuration for the hosted auth project with an optional
//! runtime override. The runtime config is read from `window.TRAILHEAD_CONFIG`
//! (if present) so static deployments can point at another project without
//! rebuilding. The anon key is public by design of the provider; do not store
//! service keys here.

use super::errors::AppError;
use tracing::Level;

/// Frontend configuration derived from build-time environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Public origin used in email links; defaults to the page origin.
    pub site_url: String,
    pub log_level: String,
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let mut config = Self {
            supabase_url: option_env!("TRAILHEAD_SUPABASE_URL")
                .unwrap_or("")
                .to_string(),
            supabase_anon_key: option_env!("TRAILHEAD_SUPABASE_ANON_KEY")
                .unwrap_or("")
                .to_string(),
            site_url: option_env!("TRAILHEAD_SITE_URL").unwrap_or("").to_string(),
            log_level: option_env!("TRAILHEAD_LOG_LEVEL")
                .unwrap_or("info")
                .to_string(),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }
        if config.site_url.trim().is_empty() {
            config.site_url = page_origin().unwrap_or_default();
        }

        config
    }

    /// Project URL and anon key, or a config error when either is missing.
    pub fn credentials(&self) -> Result<(&str, &str), AppError> {
        let url = self.supabase_url.trim().trim_end_matches('/');
        let key = self.supabase_anon_key.trim();
        if url.is_empty() || key.is_empty() {
            return Err(AppError::Config(
                "Auth is not configured. Set TRAILHEAD_SUPABASE_URL and TRAILHEAD_SUPABASE_ANON_KEY."
                    .to_string(),
            ));
        }
        Ok((url, key))
    }

    /// Absolute URL of an auth REST endpoint, e.g. `auth_url("/token")`.
    pub fn auth_url(&self, path: &str) -> Result<String, AppError> {
        let (base, _) = self.credentials()?;
        Ok(format!("{base}/auth/v1/{}", path.trim().trim_start_matches('/')))
    }

    /// Absolute link back into this site, used for email redirects.
    pub fn site_link(&self, path: &str) -> String {
        let base = self.site_url.trim().trim_end_matches('/');
        format!("{base}/{}", path.trim().trim_start_matches('/'))
    }

    pub fn max_log_level(&self) -> Level {
        parse_log_level(&self.log_level).unwrap_or(Level::INFO)
    }
}

/// Accepts level names or `0..=4` (error through trace).
pub fn parse_log_level(value: &str) -> Option<Level> {
    let value = value.trim();
    if let Ok(parsed) = value.parse::<u8>() {
        return match parsed {
            0 => Some(Level::ERROR),
            1 => Some(Level::WARN),
            2 => Some(Level::INFO),
            3 => Some(Level::DEBUG),
            4 => Some(Level::TRACE),
            _ => None,
        };
    }

    match value.to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[derive(Default)]
struct RuntimeConfig {
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    site_url: Option<String>,
    log_level: Option<String>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.supabase_url {
        config.supabase_url = value;
    }
    if let Some(value) = runtime.supabase_anon_key {
        config.supabase_anon_key = value;
    }
    if let Some(value) = runtime.site_url {
        config.site_url = value;
    }
    if let Some(value) = runtime.log_level {
        config.log_level = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("TRAILHEAD_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        supabase_url: read_runtime_value(&object, "supabase_url"),
        supabase_anon_key: read_runtime_value(&object, "supabase_anon_key"),
        site_url: read_runtime_value(&object, "site_url"),
        log_level: read_runtime_value(&object, "log_level"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Option<String> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AppConfig, RuntimeConfig, apply_runtime_overrides, normalize_runtime_value,
        parse_log_level,
    };
    use tracing::Level;

    fn config() -> AppConfig {
        AppConfig {
            supabase_url: "https://default.supabase.co/".to_string(),
            supabase_anon_key: "default-key".to_string(),
            site_url: "https://app.default".to_string(),
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  https://abc.supabase.co "),
            Some("https://abc.supabase.co".to_string())
        );
    }

    #[test]
    fn apply_runtime_overrides_ignores_empty_values() {
        let mut config = config();
        let runtime = RuntimeConfig {
            supabase_url: normalize_runtime_value(""),
            supabase_anon_key: normalize_runtime_value("  "),
            site_url: normalize_runtime_value(""),
            log_level: normalize_runtime_value(" "),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.supabase_url, "https://default.supabase.co/");
        assert_eq!(config.supabase_anon_key, "default-key");
        assert_eq!(config.site_url, "https://app.default");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn apply_runtime_overrides_overwrites_when_present() {
        let mut config = config();
        let runtime = RuntimeConfig {
            supabase_url: normalize_runtime_value("https://override.supabase.co"),
            supabase_anon_key: normalize_runtime_value("override-key"),
            site_url: normalize_runtime_value("https://app.override"),
            log_level: normalize_runtime_value("debug"),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.supabase_url, "https://override.supabase.co");
        assert_eq!(config.supabase_anon_key, "override-key");
        assert_eq!(config.site_url, "https://app.override");
        assert_eq!(config.max_log_level(), Level::DEBUG);
    }

    #[test]
    fn auth_urls_are_joined_under_the_api_prefix() {
        let config = config();
        assert_eq!(
            config.auth_url("/token?grant_type=password").unwrap(),
            "https://default.supabase.co/auth/v1/token?grant_type=password"
        );
        assert_eq!(config.site_link("/auth/confirm"), "https://app.default/auth/confirm");
    }

    #[test]
    fn missing_credentials_are_a_config_error() {
        let mut config = config();
        config.supabase_anon_key = "  ".to_string();
        assert!(config.credentials().is_err());
        assert!(config.auth_url("/user").is_err());
    }

    #[test]
    fn log_levels_accept_names_and_numbers() {
        assert_eq!(parse_log_level("WARN"), Some(Level::WARN));
        assert_eq!(parse_log_level("3"), Some(Level::DEBUG));
        assert_eq!(parse_log_level("9"), None);
        assert_eq!(parse_log_level("loud"), None);
    }
}
