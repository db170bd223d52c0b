//! The guided input sequencer.
//!
//! Walks a visitor through the name, email and message prompts, validating
//! each answer, and hands the finished record to a [`Delivery`]. Output is
//! revealed one character at a time, strictly one line after another, and
//! the [`InputGate`] drops any line committed while that is happening.
//!
//! ```text
//! Initializing -> Awaiting(Name) -> Awaiting(Email) -> Awaiting(Message)
//!                      ^                                      |
//!                      |                                 Submitting
//!                      +------------- failure ---------------+|
//!                                                   success   v
//!                                                         Completed
//! ```

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::delivery::{Delivery, Recipient, TemplateParams};
use crate::error::{DeliveryError, ValidationError};
use crate::gate::InputGate;
use crate::output::{INDICATOR_COUNT, IndicatorState, LineKind, TerminalOutput};
use crate::pacing::{BOOT_SEQUENCE, LIGHT_STAGGER, RevealPacing, SUCCESS_PAUSE};
use crate::record::AnswerRecord;
use crate::step::Step;

pub const INVALID_INPUT_LINE: &str = "Invalid input. Please try again.";
pub const PROCESSING_LINE: &str = "Processing your message...";
pub const SENT_LINE: &str = "Message sent successfully!";
pub const THANK_YOU_LINE: &str = "Thank you for reaching out. I will be in touch soon!";
pub const DELIVERY_FAILED_LINE: &str = "Error sending message. Please try again later.";

/// Where the sequencer is in its flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not yet ready for input.
    Initializing,
    /// Waiting for the answer to a step.
    Awaiting(Step),
    /// The record is being delivered.
    Submitting,
    /// Delivered; input is permanently disabled.
    Completed,
}

/// What happened to one committed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Dropped: a reveal was in progress or input is disabled.
    Ignored,
    /// Failed the current step's rule; the prompt was shown again.
    Rejected(ValidationError),
    /// Stored; the sequencer now waits for `next`.
    Accepted { next: Step },
    /// The final answer was stored and the record delivered.
    Delivered,
    /// The final answer was stored but delivery failed; the sequence
    /// restarted from the first step.
    DeliveryFailed(DeliveryError),
}

/// Host-side handle for committing lines to a running sequencer.
#[derive(Debug, Clone)]
pub struct InputHandle {
    gate: InputGate,
    tx: mpsc::UnboundedSender<String>,
}

impl InputHandle {
    /// Commit one line of input.
    ///
    /// Returns `false` when the line was dropped because the sequencer is
    /// busy, input is disabled, or the sequencer has stopped.
    pub fn commit(&self, line: impl Into<String>) -> bool {
        if !self.gate.try_acquire() {
            return false;
        }
        if self.tx.send(line.into()).is_err() {
            self.gate.release();
            return false;
        }
        true
    }

    /// Whether input is currently accepted at all.
    pub fn is_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    /// Whether the sequencer has stopped receiving lines.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving end of an [`InputHandle`], consumed by [`Sequencer::run`].
#[derive(Debug)]
pub struct InputLines {
    rx: mpsc::UnboundedReceiver<String>,
}

/// Drives one contact session.
pub struct Sequencer<O, D> {
    output: O,
    delivery: D,
    recipient: Recipient,
    pacing: RevealPacing,
    gate: InputGate,
    phase: Phase,
    record: AnswerRecord,
    started: bool,
    deliveries: usize,
}

impl<O: TerminalOutput, D: Delivery> Sequencer<O, D> {
    /// Create a sequencer that renders to `output` and sends through
    /// `delivery` to `recipient`.
    pub fn new(output: O, delivery: D, recipient: Recipient) -> Self {
        Self {
            output,
            delivery,
            recipient,
            pacing: RevealPacing::default(),
            gate: InputGate::new(),
            phase: Phase::Initializing,
            record: AnswerRecord::new(),
            started: false,
            deliveries: 0,
        }
    }

    /// Replace the reveal pacing.
    pub fn with_pacing(mut self, pacing: RevealPacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the step being asked for; [`Step::COUNT`] once the record
    /// is complete.
    pub fn step_index(&self) -> usize {
        match self.phase {
            Phase::Initializing => 0,
            Phase::Awaiting(step) => step.index(),
            Phase::Submitting | Phase::Completed => Step::COUNT,
        }
    }

    pub fn record(&self) -> &AnswerRecord {
        &self.record
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    pub fn pacing(&self) -> RevealPacing {
        self.pacing
    }

    /// The gate shared with input handles.
    pub fn gate(&self) -> &InputGate {
        &self.gate
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn is_input_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    /// Number of delivery attempts made so far.
    pub fn delivery_attempts(&self) -> usize {
        self.deliveries
    }

    /// Create the host-side handle and the matching line stream.
    pub fn input_channel(&self) -> (InputHandle, InputLines) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            InputHandle {
                gate: self.gate.clone(),
                tx,
            },
            InputLines { rx },
        )
    }

    /// Reveal the boot lines and the first prompt, then enable input.
    ///
    /// Only the first call does anything; later calls return `false`.
    pub async fn initialize(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        // Input is still disabled, so no handle can have claimed the gate.
        let held = self.gate.hold();
        debug_assert!(held, "input gate claimed before initialization");

        for index in 0..INDICATOR_COUNT {
            self.output.set_indicator(index, IndicatorState::Pending);
        }

        for (line, pause) in BOOT_SEQUENCE {
            self.reveal(LineKind::Status, line).await;
            self.pacing.pause(pause).await;
        }

        let first = Step::first();
        self.phase = Phase::Awaiting(first);
        self.reveal(LineKind::Prompt, first.prompt()).await;

        self.set_input_enabled(true);
        self.gate.release();
        info!(event = "contact_form_start", "Contact terminal ready");
        true
    }

    /// Handle one committed line.
    ///
    /// Ignored while a reveal is in progress or input is disabled.
    pub async fn submit(&mut self, raw: &str) -> SubmitOutcome {
        if !self.gate.try_acquire() {
            debug!(busy = self.gate.is_busy(), "Input ignored");
            return SubmitOutcome::Ignored;
        }
        let outcome = self.process(raw).await;
        self.gate.release();
        outcome
    }

    /// Initialize, then handle lines from `lines` until the record is
    /// delivered or every handle is dropped.
    ///
    /// Each line must have claimed the gate through [`InputHandle::commit`].
    pub async fn run(mut self, mut lines: InputLines) -> Self {
        self.initialize().await;

        while self.phase != Phase::Completed {
            let Some(line) = lines.rx.recv().await else {
                debug!("Input closed before delivery");
                break;
            };
            let outcome = self.process(&line).await;
            self.gate.release();
            debug!(?outcome, phase = ?self.phase, "Line handled");
        }

        self
    }

    async fn process(&mut self, raw: &str) -> SubmitOutcome {
        let Phase::Awaiting(step) = self.phase else {
            return SubmitOutcome::Ignored;
        };

        let value = raw.trim();
        if let Err(err) = step.check(value) {
            info!(
                event = "contact_form_validation_error",
                field = step.field_name(),
                "Answer rejected"
            );
            self.reveal(LineKind::Notice, INVALID_INPUT_LINE).await;
            self.reveal(LineKind::Prompt, step.prompt()).await;
            return SubmitOutcome::Rejected(err);
        }

        self.record.record(step, value);
        self.output
            .write_line(LineKind::Response, &format!("> {value}"));
        info!(
            event = "contact_form_step",
            step_number = step.index() + 1,
            step_name = step.field_name(),
            "Step completed"
        );

        match step.next() {
            Some(next) => {
                self.phase = Phase::Awaiting(next);
                self.reveal(LineKind::Prompt, next.prompt()).await;
                SubmitOutcome::Accepted { next }
            }
            None => self.deliver().await,
        }
    }

    async fn deliver(&mut self) -> SubmitOutcome {
        self.phase = Phase::Submitting;
        self.reveal(LineKind::Status, PROCESSING_LINE).await;

        let params = TemplateParams::new(&self.record, &self.recipient);
        self.deliveries += 1;
        debug!(delivery = self.delivery.name(), attempt = self.deliveries, "Sending record");

        match self.delivery.send(&params).await {
            Ok(()) => {
                info!(event = "contact_form_submit", status = "success", "Message delivered");
                self.reveal(LineKind::Success, SENT_LINE).await;
                self.pacing.pause(SUCCESS_PAUSE).await;
                self.reveal(LineKind::Success, THANK_YOU_LINE).await;

                self.phase = Phase::Completed;
                self.set_input_enabled(false);
                for index in 0..INDICATOR_COUNT {
                    if index > 0 {
                        self.pacing.pause(LIGHT_STAGGER).await;
                    }
                    self.output.set_indicator(index, IndicatorState::Success);
                }
                SubmitOutcome::Delivered
            }
            Err(err) => {
                warn!(
                    event = "contact_form_error",
                    delivery = self.delivery.name(),
                    error = %err,
                    "Delivery failed"
                );
                self.reveal(LineKind::Failure, DELIVERY_FAILED_LINE).await;

                let first = Step::first();
                self.record.clear();
                self.phase = Phase::Awaiting(first);
                self.reveal(LineKind::Prompt, first.prompt()).await;
                SubmitOutcome::DeliveryFailed(err)
            }
        }
    }

    /// Reveal one line, a character at a time when pacing is animated.
    async fn reveal(&mut self, kind: LineKind, text: &str) {
        self.output.begin_line(kind);
        if self.pacing.is_animated() {
            let mut buf = [0u8; 4];
            for ch in text.chars() {
                self.output.push_str(ch.encode_utf8(&mut buf));
                self.pacing.char_pause().await;
            }
        } else {
            self.output.push_str(text);
        }
        self.output.end_line();
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.gate.set_enabled(enabled);
        self.output.set_input_enabled(enabled);
    }
}

impl<O, D> std::fmt::Debug for Sequencer<O, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("phase", &self.phase)
            .field("record", &self.record)
            .field("pacing", &self.pacing)
            .field("gate", &self.gate)
            .field("deliveries", &self.deliveries)
            .finish_non_exhaustive()
    }
}
