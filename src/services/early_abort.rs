//! Early-abort policy for operating points below the decoding threshold.
//!
//! While no trial in the sweep has succeeded yet, a failing first trial marks
//! the operating point as degenerate: it is pinned to BLER 1.0 and skipped
//! without spending the block-error budget. The first success anywhere in the
//! sweep ("found start") disables the shortcut for good, since from then on
//! it would bias the estimate.

use tracing::debug;

use crate::domain::models::TrialOutcome;

/// Per-sweep early-abort state.
#[derive(Debug, Clone, Default)]
pub struct EarlyAbortPolicy {
    found_start: bool,
}

impl EarlyAbortPolicy {
    pub const fn new() -> Self {
        Self { found_start: false }
    }

    /// Whether the shortcut can still fire.
    pub const fn is_active(&self) -> bool {
        !self.found_start
    }

    /// Classify a point from its first trial.
    ///
    /// Returns `true` when the point must be finalized as degenerate.
    /// A success permanently disables the policy.
    pub fn should_abort_point(&mut self, first_trial: TrialOutcome) -> bool {
        if self.found_start {
            return false;
        }
        if first_trial.is_success() {
            debug!("First successful trial observed, early abort disabled");
            self.found_start = true;
            false
        } else {
            true
        }
    }
}
