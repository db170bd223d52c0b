//! Accumulated answers for one pass through the sequence.

use serde::Serialize;

use crate::step::Step;

/// Accepted answers, one optional slot per step.
///
/// A slot is written once when its step is accepted and only cleared as a
/// whole by [`AnswerRecord::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

impl AnswerRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the accepted answer for `step`.
    ///
    /// Returns `false` and leaves the record untouched if the slot was
    /// already written.
    pub fn record(&mut self, step: Step, value: impl Into<String>) -> bool {
        let slot = self.slot_mut(step);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value.into());
        true
    }

    /// Answer stored for `step`, if any.
    pub fn get(&self, step: Step) -> Option<&str> {
        match step {
            Step::Name => self.name.as_deref(),
            Step::Email => self.email.as_deref(),
            Step::Message => self.message.as_deref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Number of answered steps.
    pub fn len(&self) -> usize {
        Step::ALL.iter().filter(|s| self.get(**s).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every step has an answer.
    pub fn is_complete(&self) -> bool {
        self.len() == Step::COUNT
    }

    /// Drop every stored answer.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot_mut(&mut self, step: Step) -> &mut Option<String> {
        match step {
            Step::Name => &mut self.name,
            Step::Email => &mut self.email,
            Step::Message => &mut self.message,
        }
    }
}
