//! Remote endpoint configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_url() -> String {
    "http://localhost:5010/graphql".to_string()
}

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

const fn default_send_credentials() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("tally/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Single POST endpoint serving queries, mutations, and multipart uploads.
    #[serde(default = "default_url")]
    pub url: String,

    /// Whole-request timeout applied by the HTTP client, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Keep a cookie store so ambient credentials ride along on every request.
    #[serde(default = "default_send_credentials")]
    pub send_credentials: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            send_credentials: default_send_credentials(),
            user_agent: default_user_agent(),
        }
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "endpoint.url".into(),
                reason: format!("expected an http(s) URL, got '{}'", self.url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "endpoint.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_server() {
        let config = EndpointConfig::default();
        assert_eq!(config.url, "http://localhost:5010/graphql");
        assert_eq!(config.timeout(), std::time::Duration::from_secs(30));
        assert!(config.send_credentials);
        assert!(config.user_agent.starts_with("tally/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_http_url() {
        let config = EndpointConfig {
            url: "ftp://example.com/graphql".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "endpoint.url"
        ));
    }
}
