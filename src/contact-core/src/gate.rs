//! Input gate shared between the sequencer and the host.
//!
//! The gate carries the busy guard and the enabled flag. The host claims
//! the gate when it commits a line; the sequencer releases it once the line
//! has been fully handled. A line committed while the gate is held, or
//! while input is disabled, is dropped instead of queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct GateState {
    busy: AtomicBool,
    enabled: AtomicBool,
}

/// Cheaply cloneable handle to the busy and enabled flags.
#[derive(Debug, Clone, Default)]
pub struct InputGate {
    state: Arc<GateState>,
}

impl InputGate {
    /// Create a gate that starts idle and disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate for one line of input.
    ///
    /// Fails if input is disabled or another line is still being handled.
    pub fn try_acquire(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.state
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark the gate busy regardless of the enabled flag.
    ///
    /// Used while output is revealed outside of a submission, e.g. during
    /// initialization.
    pub(crate) fn hold(&self) -> bool {
        self.state
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the busy flag.
    pub fn release(&self) {
        self.state.busy.store(false, Ordering::Release);
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::Acquire)
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled.load(Ordering::Acquire)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.state.enabled.store(enabled, Ordering::Release);
    }
}
