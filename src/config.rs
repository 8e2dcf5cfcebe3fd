//! Client configuration.
//!
//! Built explicitly by the host application and handed to
//! [`EcClient::new`](crate::EcClient::new). Nothing here is global.

use std::env;
use std::time::Duration;

use crate::credential::Credentials;
use crate::types::DEFAULT_BASE_URL;

pub const ENV_CORP_ID: &str = "WORKEC_CORP_ID";
pub const ENV_APP_ID: &str = "WORKEC_APP_ID";
pub const ENV_APP_SECRET: &str = "WORKEC_APP_SECRET";
pub const ENV_BASE_URL: &str = "WORKEC_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "WORKEC_TIMEOUT_SECS";

/// Configuration for EcClient
#[derive(Debug, Clone)]
pub struct EcConfig {
    pub credentials: Credentials,
    /// Versioned API root; relative endpoint paths are joined onto it.
    pub base_url: String,
    /// Whole-request timeout. `None` leaves latency unbounded.
    pub timeout: Option<Duration>,
    /// Turn non-2xx responses into [`EcError::Status`](crate::EcError::Status)
    /// instead of returning their body.
    pub error_for_status: bool,
}

impl Default for EcConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            error_for_status: true,
        }
    }
}

impl EcConfig {
    pub fn new(
        corp_id: impl AsRef<str>,
        app_id: impl AsRef<str>,
        app_secret: impl AsRef<str>,
    ) -> Self {
        Self {
            credentials: Credentials::new(corp_id, app_id, app_secret),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_error_for_status(mut self, error_for_status: bool) -> Self {
        self.error_for_status = error_for_status;
        self
    }

    /// Read configuration from `WORKEC_*` environment variables.
    ///
    /// Missing credentials become empty strings rather than an error.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let mut config = Self::new(var(ENV_CORP_ID), var(ENV_APP_ID), var(ENV_APP_SECRET));

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Some(Duration::from_secs(secs)),
                _ => tracing::warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, raw),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EcConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
        assert!(config.error_for_status);
        assert_eq!(config.credentials, Credentials::default());
    }

    #[test]
    fn test_from_lookup() {
        let config = EcConfig::from_lookup(lookup_from(&[
            (ENV_CORP_ID, " 21299 "),
            (ENV_APP_ID, "abc123"),
            (ENV_APP_SECRET, "secret456"),
            (ENV_BASE_URL, "http://127.0.0.1:9000/v2/"),
            (ENV_TIMEOUT_SECS, "15"),
        ]));
        assert_eq!(config.credentials, Credentials::new("21299", "abc123", "secret456"));
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v2/");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_missing_variables_are_empty() {
        let config = EcConfig::from_lookup(|_| None);
        assert_eq!(config.credentials, Credentials::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_timeout_ignored() {
        let config = EcConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "soon")]));
        assert!(config.timeout.is_none());

        let config = EcConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "0")]));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_builder() {
        let config = EcConfig::new("c", "a", "s")
            .with_base_url("http://localhost:1/")
            .with_timeout(Duration::from_millis(250))
            .with_error_for_status(false);
        assert_eq!(config.base_url, "http://localhost:1/");
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
        assert!(!config.error_for_status);
    }
}
