//! # Client configuration: `learnonline.toml`
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//! timeout_secs = 10
//!
//! [guest]
//! cookie_days = 30
//! ```
//!
//! Every section has production defaults, so a missing or empty file is
//! equivalent to [`ClientConfig::default`]. Native builds can override the
//! API section from the environment (after loading `.env`) with
//! `LEARNONLINE_API_URL` and `LEARNONLINE_API_TIMEOUT_SECS`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_URL_VAR: &str = "LEARNONLINE_API_URL";
pub const API_TIMEOUT_VAR: &str = "LEARNONLINE_API_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("{var} must be a number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Top-level configuration stored in `learnonline.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub guest: GuestConfig,
}

/// Backend connection settings shared by every request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. Ignored on wasm, where `fetch` has none.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Guest identity cookie settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuestConfig {
    #[serde(default = "default_cookie_days")]
    pub cookie_days: i64,
}

fn default_cookie_days() -> i64 {
    30
}

impl Default for GuestConfig {
    fn default() -> Self {
        Self {
            cookie_days: default_cookie_days(),
        }
    }
}

impl ClientConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "learnonline.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builder method to point at another backend.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Apply overrides from a variable lookup. Split out from
    /// [`from_env`](Self::from_env) so it can be exercised without touching
    /// the process environment.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(value) = lookup(API_TIMEOUT_VAR) {
            self.api.timeout_secs = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout {
                    var: API_TIMEOUT_VAR,
                    value,
                })?;
        }
        Ok(self)
    }

    /// Defaults overridden by `.env` and the process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Override this config from `.env` and the process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        self.with_overrides(|var| std::env::var(var).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.guest.cookie_days, 30);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ClientConfig::from_toml("").unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = ClientConfig::from_toml(
            r#"
            [api]
            base_url = "https://learn.example.org"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://learn.example.org");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.guest.cookie_days, 30);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ClientConfig::default().with_base_url("https://learn.example.org");
        let text = config.to_toml().unwrap();
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ClientConfig::from_toml("[api]\ntimeout_secs = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (API_URL_VAR, " https://api.example.org "),
            (API_TIMEOUT_VAR, "30"),
        ]
        .into_iter()
        .collect();
        let config = ClientConfig::default()
            .with_overrides(|var| vars.get(var).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.api.base_url, "https://api.example.org");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_blank_url_override_is_ignored() {
        let config = ClientConfig::default()
            .with_overrides(|var| (var == API_URL_VAR).then(|| "  ".to_string()))
            .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_bad_timeout_override() {
        let result = ClientConfig::default()
            .with_overrides(|var| (var == API_TIMEOUT_VAR).then(|| "ten".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidTimeout { .. })));
    }
}
