//! Error-count stopping rule for one operating point.
//!
//! Trials are drawn until exactly `target_block_errors` block errors have been
//! counted, so the relative precision of the BLER estimate is roughly the same
//! at every SNR: low-BLER points simply run more trials.

use crate::domain::models::{OperatingPoint, PointStatus, TrialOutcome};

/// Accumulates trials into the active operating point.
#[derive(Debug, Clone)]
pub struct ConvergenceTracker {
    point: OperatingPoint,
    target_block_errors: u64,
}

impl ConvergenceTracker {
    pub const fn new(point: OperatingPoint, target_block_errors: u64) -> Self {
        Self {
            point,
            target_block_errors,
        }
    }

    pub fn record(&mut self, outcome: TrialOutcome) {
        self.point.record(outcome);
    }

    pub const fn is_point_converged(&self) -> bool {
        self.point.error_count() >= self.target_block_errors
    }

    /// Running BLER, `None` before the first trial.
    pub fn current_bler(&self) -> Option<f64> {
        self.point.bler()
    }

    pub const fn point(&self) -> &OperatingPoint {
        &self.point
    }

    /// Freeze the point as converged.
    pub fn into_converged(mut self) -> OperatingPoint {
        debug_assert!(self.is_point_converged());
        self.point.finalize(PointStatus::Converged);
        self.point
    }

    /// Freeze the point as degenerate (BLER pinned to 1.0).
    pub fn into_degenerate(mut self) -> OperatingPoint {
        self.point.finalize(PointStatus::Degenerate);
        self.point
    }
}
