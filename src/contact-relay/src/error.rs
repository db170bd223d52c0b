//! Error types for the relay client.

use contact_core::DeliveryError;
use thiserror::Error;

/// Errors that can occur while talking to the email relay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration error (missing or invalid setting).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Network/HTTP transport error.
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not finish within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The relay answered with a non-success status.
    #[error("Relay rejected the message ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, which the relay uses for its reason.
        message: String,
    },
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout(err.to_string())
        } else if err.is_connect() {
            RelayError::Network(format!("Connection failed: {}", err))
        } else {
            RelayError::Network(err.to_string())
        }
    }
}

impl RelayError {
    /// Whether sending the same message again could plausibly succeed.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            Self::Config(_) | Self::Client(_) => false,
        }
    }

    /// Whether the relay blamed the request itself (4xx other than 429).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Rejected { status, .. } if (400..500).contains(status) && *status != 429)
    }
}

impl From<RelayError> for DeliveryError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Config(msg) | RelayError::Client(msg) => DeliveryError::Misconfigured(msg),
            RelayError::Network(msg) | RelayError::Timeout(msg) => DeliveryError::Transport(msg),
            RelayError::Rejected { status, message } => DeliveryError::Rejected { status, message },
        }
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = std::result::Result<T, RelayError>;
