//! Delivery that prints the message instead of sending it.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use contact_core::{Delivery, DeliveryError, DeliveryResult, TemplateParams};
use tracing::info;

/// Writes the template fields as pretty JSON and reports success.
pub struct DryRunDelivery<W> {
    sink: Mutex<W>,
}

impl DryRunDelivery<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> DryRunDelivery<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<W: Write + Send> Delivery for DryRunDelivery<W> {
    async fn send(&self, params: &TemplateParams) -> DeliveryResult<()> {
        let json = serde_json::to_string_pretty(params)
            .map_err(|e| DeliveryError::Misconfigured(format!("Failed to encode message: {e}")))?;

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| DeliveryError::Transport("dry-run sink poisoned".to_string()))?;
        writeln!(sink, "{json}")
            .and_then(|()| sink.flush())
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        info!(to = %params.to_email, "Dry run: message not sent");
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

impl<W> std::fmt::Debug for DryRunDelivery<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DryRunDelivery").finish_non_exhaustive()
    }
}
