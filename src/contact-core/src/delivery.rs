//! The delivery collaborator seam.
//!
//! A delivery takes the finished record, flattened into the named fields an
//! email template expects, and hands it to whatever service actually sends
//! it. Which service and template are used is bound when the collaborator is
//! constructed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::DeliveryResult;
use crate::record::AnswerRecord;

/// Fixed identity of the person receiving contact messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

impl Recipient {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Flat field map handed to the delivery collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub to_email: String,
    pub to_name: String,
    pub from_name: String,
    pub from_email: String,
    pub message: String,
}

impl TemplateParams {
    /// Flatten an answer record addressed to `recipient`.
    ///
    /// Unanswered steps become empty strings.
    pub fn new(record: &AnswerRecord, recipient: &Recipient) -> Self {
        Self {
            to_email: recipient.email.clone(),
            to_name: recipient.name.clone(),
            from_name: record.name().unwrap_or_default().to_string(),
            from_email: record.email().unwrap_or_default().to_string(),
            message: record.message().unwrap_or_default().to_string(),
        }
    }
}

/// Something that can send a finished contact record.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Send one message. Any error means the message was not delivered.
    async fn send(&self, params: &TemplateParams) -> DeliveryResult<()>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "delivery"
    }
}

#[async_trait]
impl<T: Delivery + ?Sized> Delivery for Arc<T> {
    async fn send(&self, params: &TemplateParams) -> DeliveryResult<()> {
        (**self).send(params).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: Delivery + ?Sized> Delivery for Box<T> {
    async fn send(&self, params: &TemplateParams) -> DeliveryResult<()> {
        (**self).send(params).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
