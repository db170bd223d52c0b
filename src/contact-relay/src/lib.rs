//! EmailJS relay client for the contact terminal.
//!
//! Implements the `contact_core::Delivery` seam on top of the EmailJS REST
//! send endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use contact_relay::{EmailJsClient, RelayConfig};
//!
//! let config = RelayConfig::new("service_abc", "template_xyz", public_key);
//! let relay = EmailJsClient::new(config)?;
//! relay.send_email(&params).await?;
//! ```
//!
//! The `CONTACT_RELAY_*` names in [`config`] are the environment variables
//! a host reads to override these settings.

mod client;
pub mod config;
mod error;
pub mod http_client;

pub use client::EmailJsClient;
pub use config::{DEFAULT_ENDPOINT, RelayConfig};
pub use error::{RelayError, RelayResult};
