//! The fixed prompt steps and their validation rules.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::ValidationError;

/// Minimum number of characters in an accepted name.
pub const MIN_NAME_CHARS: usize = 2;

/// Minimum number of characters in an accepted message.
pub const MIN_MESSAGE_CHARS: usize = 10;

/// One "@", at least one "." after it, no whitespace anywhere.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

/// One position in the three-part prompt sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Sender name.
    Name,
    /// Sender email address.
    Email,
    /// Message body.
    Message,
}

impl Step {
    /// All steps in prompt order.
    pub const ALL: [Step; 3] = [Step::Name, Step::Email, Step::Message];

    /// Number of steps in the sequence.
    pub const COUNT: usize = Self::ALL.len();

    /// The first step of the sequence.
    pub const fn first() -> Self {
        Step::Name
    }

    /// Step at the given position, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Zero-based position of this step.
    pub const fn index(self) -> usize {
        match self {
            Step::Name => 0,
            Step::Email => 1,
            Step::Message => 2,
        }
    }

    /// The step after this one, or `None` for the last step.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Prompt line shown to the visitor.
    pub const fn prompt(self) -> &'static str {
        match self {
            Step::Name => "Enter your name: ",
            Step::Email => "Enter your email: ",
            Step::Message => "Enter your message: ",
        }
    }

    /// Short field name used in logs.
    pub const fn field_name(self) -> &'static str {
        match self {
            Step::Name => "name",
            Step::Email => "email",
            Step::Message => "message",
        }
    }

    /// Human-readable description of the rule.
    pub const fn rule(self) -> &'static str {
        match self {
            Step::Name => "must be at least 2 characters",
            Step::Email => "must look like name@domain.tld",
            Step::Message => "must be at least 10 characters",
        }
    }

    /// Whether `value` satisfies this step's rule.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Step::Name => value.trim().chars().count() >= MIN_NAME_CHARS,
            Step::Email => EMAIL_PATTERN.is_match(value),
            Step::Message => value.trim().chars().count() >= MIN_MESSAGE_CHARS,
        }
    }

    /// Check `value` against this step's rule.
    pub fn check(self, value: &str) -> Result<(), ValidationError> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(ValidationError::new(self))
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Validate `value` for the step at position `index`.
///
/// Positions outside the sequence reject every value.
pub fn validate(index: usize, value: &str) -> bool {
    Step::from_index(index).is_some_and(|step| step.accepts(value))
}
