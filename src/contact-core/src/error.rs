//! Error types for the contact sequencer.
//!
//! Only two kinds of failure are recognized: an answer that does not pass
//! its step's rule, and a delivery collaborator that could not send the
//! finished record. Neither is fatal to the session.

use thiserror::Error;

use crate::step::Step;

/// An answer rejected by the rule of the step it was given for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {}: {}", .step.field_name(), .step.rule())]
pub struct ValidationError {
    /// Step whose rule was not met.
    pub step: Step,
}

impl ValidationError {
    /// Create a validation error for the given step.
    pub fn new(step: Step) -> Self {
        Self { step }
    }
}

/// Errors reported by a delivery collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The collaborator is not usable as configured.
    #[error("Delivery misconfigured: {0}")]
    Misconfigured(String),

    /// The message could not reach the relay.
    #[error("Delivery transport error: {0}")]
    Transport(String),

    /// The relay answered but refused the message.
    #[error("Delivery rejected with status {status}: {message}")]
    Rejected {
        /// HTTP-like status code returned by the relay.
        status: u16,
        /// Body or reason returned alongside the status.
        message: String,
    },
}

/// Result type for delivery operations.
pub type DeliveryResult<T> = std::result::Result<T, DeliveryError>;
