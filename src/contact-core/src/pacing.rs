//! Timing for the simulated character-by-character reveal.

use std::time::Duration;

/// Default delay between revealed characters.
pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(30);

/// Pause between the success line and the closing thank-you line.
pub const SUCCESS_PAUSE: Duration = Duration::from_millis(500);

/// Stagger between indicator lights turning green.
pub const LIGHT_STAGGER: Duration = Duration::from_millis(200);

/// Status lines shown during initialization, each with the pause after it.
pub const BOOT_SEQUENCE: [(&str, Duration); 4] = [
    ("Initializing contact terminal...", Duration::from_millis(500)),
    ("Running system checks...", Duration::from_millis(400)),
    ("Establishing connection...", Duration::from_millis(600)),
    (
        "Welcome! Please provide your contact information.",
        Duration::from_millis(400),
    ),
];

/// How fast lines are revealed and how long the fixed pauses last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealPacing {
    /// Delay after each revealed character.
    pub char_delay: Duration,
    /// Whether the fixed pauses (boot lines, success, lights) are observed.
    pub pauses: bool,
}

impl Default for RevealPacing {
    fn default() -> Self {
        Self {
            char_delay: DEFAULT_CHAR_DELAY,
            pauses: true,
        }
    }
}

impl RevealPacing {
    /// Pacing with no delays at all; lines appear whole.
    pub const fn instant() -> Self {
        Self {
            char_delay: Duration::ZERO,
            pauses: false,
        }
    }

    /// Default pauses with a custom per-character delay.
    pub const fn with_char_delay(char_delay: Duration) -> Self {
        Self {
            char_delay,
            pauses: true,
        }
    }

    /// Whether characters are revealed one at a time.
    pub fn is_animated(&self) -> bool {
        !self.char_delay.is_zero()
    }

    /// Sleep after one revealed character.
    pub async fn char_pause(&self) {
        if self.is_animated() {
            tokio::time::sleep(self.char_delay).await;
        }
    }

    /// Sleep for one of the fixed pauses, if pauses are on.
    pub async fn pause(&self, duration: Duration) {
        if self.pauses && !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
