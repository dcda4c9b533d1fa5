use std::fmt;

#[derive(Clone, Debug)]
pub enum AppError {
    Config(String),
    Network(String),
    Timeout(String),
    /// Non-2xx response; `body` is the raw response text.
    Http {
        status: u16,
        body: String,
    },
    Parse(String),
    Serialization(String),
    /// A DOM call failed.
    Browser(String),
}

/// Maximum number of error body characters shown in `Display`.
const MAX_ERROR_CHARS: usize = 200;

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(formatter, "Config error: {message}"),
            AppError::Network(message) => write!(formatter, "Network error: {message}"),
            AppError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            AppError::Http { status, body } => {
                let body: String = body.trim().chars().take(MAX_ERROR_CHARS).collect();
                write!(formatter, "Request failed ({status}): {body}")
            }
            AppError::Parse(message) => write!(formatter, "Response error: {message}"),
            AppError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
            AppError::Browser(message) => write!(formatter, "Browser error: {message}"),
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(target_arch = "wasm32")]
impl From<AppError> for auth_state::AuthError {
    fn from(err: AppError) -> Self {
        use auth_state::{AuthError, AuthErrorKind};

        match err {
            AppError::Http { status, body } => AuthError::from_response(status, &body),
            AppError::Network(message) | AppError::Timeout(message) => AuthError::network(message),
            other => AuthError::with_kind(AuthErrorKind::Unknown, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn http_display_truncates_body() {
        let err = AppError::Http {
            status: 500,
            body: format!("  {}  ", "x".repeat(300)),
        };
        let rendered = err.to_string();
        assert!(rendered.starts_with("Request failed (500): xxx"));
        assert_eq!(rendered.len(), "Request failed (500): ".len() + 200);
    }
}
