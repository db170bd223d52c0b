//! Configuration file and environment overrides.
//!
//! ```toml
//! [relay]
//! service_id = "service_abc"
//! template_id = "template_xyz"
//! public_key = "pk_..."
//! # endpoint = "https://api.emailjs.com/api/v1.0/email/send"
//! # access_token = "..."
//! # timeout_secs = 30
//!
//! [recipient]
//! email = "owner@example.com"
//! name = "Site Owner"
//!
//! [pacing]
//! char_delay_ms = 30
//! instant = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use contact_core::{Recipient, RevealPacing};
use contact_relay::config::{
    ENV_ACCESS_TOKEN, ENV_ENDPOINT, ENV_PUBLIC_KEY, ENV_SERVICE_ID, ENV_TEMPLATE_ID,
};
use contact_relay::{RelayConfig, RelayError};

pub const CONFIG_DIR_NAME: &str = ".contact-terminal";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_RECIPIENT_EMAIL: &str = "CONTACT_RECIPIENT_EMAIL";
pub const ENV_RECIPIENT_NAME: &str = "CONTACT_RECIPIENT_NAME";

/// Recipient used by `--dry-run` when none is configured.
pub const DRY_RUN_RECIPIENT: &str = "owner@example.com";

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required setting '{0}' (set it in the config file or the environment)")]
    Missing(&'static str),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// `[relay]` table.
#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelaySection {
    pub endpoint: Option<String>,
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for RelaySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySection")
            .field("endpoint", &self.endpoint)
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &self.public_key.as_ref().map(|_| "[REDACTED]"))
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// `[recipient]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecipientSection {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// `[pacing]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PacingSection {
    pub char_delay_ms: Option<u64>,
    pub instant: bool,
}

/// Everything the terminal needs, merged from file and environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub relay: RelaySection,
    pub recipient: RecipientSection,
    pub pacing: PacingSection,
}

impl AppConfig {
    /// Default location, `~/.contact-terminal/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::NotFound(path));
            }
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay values from `lookup`. Empty values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let overrides = [
            (ENV_ENDPOINT, &mut self.relay.endpoint),
            (ENV_SERVICE_ID, &mut self.relay.service_id),
            (ENV_TEMPLATE_ID, &mut self.relay.template_id),
            (ENV_PUBLIC_KEY, &mut self.relay.public_key),
            (ENV_ACCESS_TOKEN, &mut self.relay.access_token),
            (ENV_RECIPIENT_EMAIL, &mut self.recipient.email),
            (ENV_RECIPIENT_NAME, &mut self.recipient.name),
        ];
        for (key, slot) in overrides {
            if let Some(value) = get(key) {
                debug!(key, "Config value overridden from environment");
                *slot = Some(value);
            }
        }
    }

    /// Build and validate the relay configuration.
    pub fn relay_config(&self) -> Result<RelayConfig, ConfigError> {
        let relay = &self.relay;
        let service_id = required(&relay.service_id, "relay.service_id")?;
        let template_id = required(&relay.template_id, "relay.template_id")?;
        let public_key = required(&relay.public_key, "relay.public_key")?;

        let mut config = RelayConfig::new(service_id, template_id, public_key);
        if let Some(endpoint) = &relay.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(token) = relay.access_token.as_deref().filter(|t| !t.trim().is_empty()) {
            config = config.with_access_token(token);
        }
        if let Some(secs) = relay.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// The configured recipient. The email is required; the name may be
    /// empty.
    pub fn recipient(&self) -> Result<Recipient, ConfigError> {
        let email = required(&self.recipient.email, "recipient.email")?;
        let name = self.recipient.name.clone().unwrap_or_default();
        Ok(Recipient::new(email, name))
    }

    /// Reveal pacing, with command-line flags taking precedence.
    pub fn pacing(&self, instant: bool, char_delay_ms: Option<u64>) -> RevealPacing {
        if instant || self.pacing.instant {
            return RevealPacing::instant();
        }
        match char_delay_ms.or(self.pacing.char_delay_ms) {
            Some(ms) => RevealPacing::with_char_delay(Duration::from_millis(ms)),
            None => RevealPacing::default(),
        }
    }
}

fn required<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}
