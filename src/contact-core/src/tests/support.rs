//! Test doubles for the sequencer suites.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::delivery::{Delivery, Recipient, TemplateParams};
use crate::error::{DeliveryError, DeliveryResult};
use crate::output::{IndicatorState, LineKind, TerminalOutput, Transcript};
use crate::pacing::RevealPacing;
use crate::sequencer::Sequencer;

/// Delivery that records every call and replays scripted results.
///
/// Once the script runs out every call succeeds.
#[derive(Clone, Default)]
pub struct ScriptedDelivery {
    sent: Arc<Mutex<Vec<TemplateParams>>>,
    script: Arc<Mutex<VecDeque<DeliveryResult<()>>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedDelivery {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing_once() -> Self {
        let delivery = Self::default();
        delivery
            .script
            .lock()
            .unwrap()
            .push_back(Err(DeliveryError::Transport("connection reset".to_string())));
        delivery
    }

    /// Every call waits until `release` is notified.
    pub fn held(release: Arc<Notify>) -> Self {
        Self {
            gate: Some(release),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<TemplateParams> {
        self.sent.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Delivery for ScriptedDelivery {
    async fn send(&self, params: &TemplateParams) -> DeliveryResult<()> {
        self.sent.lock().unwrap().push(params.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or(Ok(()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Transcript that stays readable while a spawned session writes to it.
#[derive(Clone, Default)]
pub struct SharedTranscript(Arc<Mutex<Transcript>>);

impl SharedTranscript {
    pub fn snapshot(&self) -> Transcript {
        self.0.lock().unwrap().clone()
    }

    pub fn open_text(&self) -> Option<String> {
        self.0.lock().unwrap().open_text().map(str::to_string)
    }
}

impl TerminalOutput for SharedTranscript {
    fn begin_line(&mut self, kind: LineKind) {
        self.0.lock().unwrap().begin_line(kind);
    }

    fn push_str(&mut self, text: &str) {
        self.0.lock().unwrap().push_str(text);
    }

    fn end_line(&mut self) {
        self.0.lock().unwrap().end_line();
    }

    fn set_indicator(&mut self, index: usize, state: IndicatorState) {
        self.0.lock().unwrap().set_indicator(index, state);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.0.lock().unwrap().set_input_enabled(enabled);
    }
}

pub fn recipient() -> Recipient {
    Recipient::new("owner@example.com", "Owner")
}

pub fn instant_sequencer(delivery: ScriptedDelivery) -> Sequencer<Transcript, ScriptedDelivery> {
    Sequencer::new(Transcript::new(), delivery, recipient()).with_pacing(RevealPacing::instant())
}

pub async fn ready_sequencer(
    delivery: ScriptedDelivery,
) -> Sequencer<Transcript, ScriptedDelivery> {
    let mut sequencer = instant_sequencer(delivery);
    assert!(sequencer.initialize().await);
    sequencer
}
