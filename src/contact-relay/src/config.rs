//! Configuration for the EmailJS relay.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::error::{RelayError, RelayResult};

/// Default EmailJS send endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Environment variables that override relay settings.
pub const ENV_ENDPOINT: &str = "CONTACT_RELAY_ENDPOINT";
pub const ENV_SERVICE_ID: &str = "CONTACT_RELAY_SERVICE_ID";
pub const ENV_TEMPLATE_ID: &str = "CONTACT_RELAY_TEMPLATE_ID";
pub const ENV_PUBLIC_KEY: &str = "CONTACT_RELAY_PUBLIC_KEY";
pub const ENV_ACCESS_TOKEN: &str = "CONTACT_RELAY_ACCESS_TOKEN";

/// Configuration for the EmailJS relay.
#[derive(Clone)]
pub struct RelayConfig {
    /// Send endpoint URL.
    endpoint: String,
    /// EmailJS service identifier.
    service_id: String,
    /// EmailJS template identifier.
    template_id: String,
    /// Account public key, sent as `user_id`.
    public_key: SecretString,
    /// Private access token (optional, for accounts that require it).
    access_token: Option<SecretString>,
    /// Overall request timeout (optional).
    timeout: Option<Duration>,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("endpoint", &self.endpoint)
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &"[REDACTED]")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RelayConfig {
    /// Create a configuration for the default endpoint.
    pub fn new(
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key: SecretString::new(public_key.into().into()),
            access_token: None,
            timeout: None,
        }
    }

    /// Send to a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Attach a private access token.
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::new(access_token.into().into()));
        self
    }

    /// Bound each request by an overall timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    /// Get the public key.
    pub fn public_key(&self) -> &str {
        self.public_key.expose_secret()
    }

    /// Get the access token, if configured.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(|s| s.expose_secret())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Validate the configuration.
    pub fn validate(&self) -> RelayResult<()> {
        if self.service_id.trim().is_empty() {
            return Err(RelayError::Config("service_id is empty".to_string()));
        }
        if self.template_id.trim().is_empty() {
            return Err(RelayError::Config("template_id is empty".to_string()));
        }
        if self.public_key.expose_secret().trim().is_empty() {
            return Err(RelayError::Config("public_key is empty".to_string()));
        }

        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| RelayError::Config(format!("Invalid endpoint '{}': {e}", self.endpoint)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(RelayError::Config(format!(
                "Endpoint must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(RelayError::Config("timeout must be greater than zero".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = RelayConfig::new("service_x", "template_y", "pk_123");

        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.service_id(), "service_x");
        assert_eq!(config.template_id(), "template_y");
        assert_eq!(config.public_key(), "pk_123");
        assert_eq!(config.access_token(), None);
        assert_eq!(config.timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builders() {
        let config = RelayConfig::new("s", "t", "k")
            .with_endpoint("http://localhost:9000/send")
            .with_access_token("secret-token")
            .with_timeout(Duration::from_secs(20));

        assert_eq!(config.endpoint(), "http://localhost:9000/send");
        assert_eq!(config.access_token(), Some("secret-token"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(20)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        assert!(RelayConfig::new("", "t", "k").validate().is_err());
        assert!(RelayConfig::new("s", "  ", "k").validate().is_err());
        assert!(RelayConfig::new("s", "t", "").validate().is_err());
        assert!(
            RelayConfig::new("s", "t", "k")
                .with_endpoint("not a url")
                .validate()
                .is_err()
        );
        assert!(
            RelayConfig::new("s", "t", "k")
                .with_endpoint("ftp://example.com/send")
                .validate()
                .is_err()
        );
        assert!(
            RelayConfig::new("s", "t", "k")
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let config = RelayConfig::new("s", "t", "super-public-key").with_access_token("private-token");

        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("super-public-key"));
        assert!(!debug_str.contains("private-token"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
