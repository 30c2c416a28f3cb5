use stylescope_core::upload::DEFAULT_MAX_UPLOAD_BYTES;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a backend running locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base HTTP URL of the backend (default: `http://localhost:5000`).
    pub api_url: String,
    /// Progress WebSocket URL. The channel is disabled when unset.
    pub ws_url: Option<String>,
    /// Per-request timeout. `None` keeps reqwest's default (no timeout).
    pub request_timeout_secs: Option<u64>,
    /// Upload ceiling in bytes (default: 5 MiB).
    pub max_upload_bytes: u64,
    /// Path of the feedback endpoint (default: `/feedback`).
    pub feedback_path: String,
    /// Path of the status-refresh endpoint (default: `/api/status`).
    pub status_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".into(),
            ws_url: None,
            request_timeout_secs: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            feedback_path: "/feedback".into(),
            status_path: "/api/status".into(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `STYLE_API_URL`        | `http://localhost:5000` |
    /// | `STYLE_WS_URL`         | unset (disabled)        |
    /// | `REQUEST_TIMEOUT_SECS` | unset (no timeout)      |
    /// | `MAX_UPLOAD_BYTES`     | `5242880`               |
    /// | `FEEDBACK_PATH`        | `/feedback`             |
    /// | `STATUS_PATH`          | `/api/status`           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = var("STYLE_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let ws_url = var("STYLE_WS_URL");

        let request_timeout_secs = var("REQUEST_TIMEOUT_SECS")
            .map(|v| parse_number("REQUEST_TIMEOUT_SECS", &v))
            .transpose()?;

        let max_upload_bytes = var("MAX_UPLOAD_BYTES")
            .map(|v| parse_number("MAX_UPLOAD_BYTES", &v))
            .transpose()?
            .unwrap_or(defaults.max_upload_bytes);

        let feedback_path = var("FEEDBACK_PATH")
            .map(|p| normalize_path(&p))
            .unwrap_or(defaults.feedback_path);

        let status_path = var("STATUS_PATH")
            .map(|p| normalize_path(&p))
            .unwrap_or(defaults.status_path);

        Ok(Self {
            api_url,
            ws_url,
            request_timeout_secs,
            max_upload_bytes,
            feedback_path,
            status_path,
        })
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(load(&[]).unwrap(), ClientConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("STYLE_API_URL", "https://style.example.com/"),
            ("STYLE_WS_URL", "wss://style.example.com/ws"),
            ("REQUEST_TIMEOUT_SECS", "15"),
            ("MAX_UPLOAD_BYTES", "1048576"),
            ("FEEDBACK_PATH", "submit-feedback"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://style.example.com");
        assert_eq!(config.ws_url.as_deref(), Some("wss://style.example.com/ws"));
        assert_eq!(config.request_timeout_secs, Some(15));
        assert_eq!(config.max_upload_bytes, 1_048_576);
        assert_eq!(config.feedback_path, "/submit-feedback");
        assert_eq!(config.status_path, "/api/status");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("STYLE_API_URL", "  "), ("STYLE_WS_URL", "")]).unwrap();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert!(config.ws_url.is_none());
    }

    #[test]
    fn malformed_number_is_an_error() {
        let err = load(&[("MAX_UPLOAD_BYTES", "5MB")]).unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_BYTES"));
    }
}
