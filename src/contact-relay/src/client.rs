//! EmailJS REST client.

use async_trait::async_trait;
use contact_core::{Delivery, DeliveryResult, TemplateParams};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::http_client::create_relay_client;

/// Body of an EmailJS send request.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a TemplateParams,
}

/// Client that sends contact messages through EmailJS.
///
/// The service and template are bound at construction, so each send only
/// carries the template fields.
#[derive(Clone)]
pub struct EmailJsClient {
    client: reqwest::Client,
    config: RelayConfig,
}

impl EmailJsClient {
    /// Create a client after validating `config`.
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        config.validate()?;
        let client = create_relay_client(config.timeout()).map_err(RelayError::Client)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Send one message.
    pub async fn send_email(&self, params: &TemplateParams) -> RelayResult<()> {
        let body = SendRequest {
            service_id: self.config.service_id(),
            template_id: self.config.template_id(),
            user_id: self.config.public_key(),
            access_token: self.config.access_token(),
            template_params: params,
        };

        debug!(
            endpoint = self.config.endpoint(),
            service_id = self.config.service_id(),
            template_id = self.config.template_id(),
            "Sending message through relay"
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "Relay accepted message");
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(RelayError::Rejected {
                status: status.as_u16(),
                message: message.trim().to_string(),
            })
        }
    }
}

impl std::fmt::Debug for EmailJsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailJsClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Delivery for EmailJsClient {
    async fn send(&self, params: &TemplateParams) -> DeliveryResult<()> {
        self.send_email(params).await.map_err(|err| {
            warn!(
                retriable = err.is_retriable(),
                client_error = err.is_client_error(),
                error = %err,
                "Relay send failed"
            );
            err.into()
        })
    }

    fn name(&self) -> &str {
        "emailjs"
    }
}
