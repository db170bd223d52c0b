//! Guided input sequencer for the contact terminal.
//!
//! This crate holds everything about the contact session that does not
//! depend on where it is rendered or how the message is sent:
//! - The three fixed prompt steps and their validation rules
//! - The fixed-shape answer record
//! - The input gate (busy guard and enabled flag)
//! - Reveal pacing for the character-by-character output
//! - The `TerminalOutput` and `Delivery` seams
//! - The `Sequencer` state machine itself
//!
//! # Example
//!
//! ```rust,ignore
//! use contact_core::{Recipient, RevealPacing, Sequencer, Transcript};
//!
//! let mut sequencer = Sequencer::new(Transcript::new(), relay, Recipient::new("me@example.com", "Me"))
//!     .with_pacing(RevealPacing::instant());
//! sequencer.initialize().await;
//! sequencer.submit("Al").await;
//! ```

pub mod delivery;
pub mod error;
pub mod gate;
pub mod output;
pub mod pacing;
pub mod record;
pub mod sequencer;
pub mod step;

pub use delivery::{Delivery, Recipient, TemplateParams};
pub use error::{DeliveryError, DeliveryResult, ValidationError};
pub use gate::InputGate;
pub use output::{
    INDICATOR_COUNT, IndicatorState, LineKind, TerminalOutput, Transcript, TranscriptLine,
};
pub use pacing::RevealPacing;
pub use record::AnswerRecord;
pub use sequencer::{InputHandle, InputLines, Phase, Sequencer, SubmitOutcome};
pub use step::{Step, validate};

#[cfg(test)]
mod tests;
