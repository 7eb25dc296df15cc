//! Immutable per-sweep parameters.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Identifies the code to construct: a structure and its scaling parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSpec {
    /// Code-structure identifier, e.g. `qc-r12`.
    pub structure: String,
    /// Structure-specific scaling parameter (lifting size, repetition factor).
    pub scaling: u32,
    /// Decoder iteration budget.
    pub max_iterations: u32,
    /// Normalization factor applied to min-sum check messages.
    pub min_sum_scale: f64,
    /// Requested message length; `None` uses the code's full input size.
    pub info_bits: Option<usize>,
}

/// Parameters of one sweep: a code configuration, its stopping rules, its
/// SNR grid and its RNG seed. Read-only for the duration of the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepParameters {
    pub code: CodeSpec,
    /// Block errors to collect before an operating point is finalized.
    pub target_block_errors: u64,
    /// The sweep ends at the first point whose BLER is strictly below this.
    pub target_bler: f64,
    pub esn0_start_db: f64,
    pub esn0_step_db: f64,
    pub seed: u64,
}

impl SweepParameters {
    /// Check the invariants the controller relies on.
    pub fn validate(&self) -> DomainResult<()> {
        if !(self.esn0_step_db.is_finite() && self.esn0_step_db > 0.0) {
            return Err(DomainError::InvalidParameters(format!(
                "SNR step must be positive, got {}",
                self.esn0_step_db
            )));
        }
        if !(self.target_bler > 0.0 && self.target_bler < 1.0) {
            return Err(DomainError::InvalidParameters(format!(
                "target BLER must lie in (0, 1), got {}",
                self.target_bler
            )));
        }
        if self.target_block_errors == 0 {
            return Err(DomainError::InvalidParameters(
                "target block errors must be at least 1".to_string(),
            ));
        }
        if !self.esn0_start_db.is_finite() {
            return Err(DomainError::InvalidParameters(format!(
                "starting SNR must be finite, got {}",
                self.esn0_start_db
            )));
        }
        Ok(())
    }

    /// SNR of the `step_index`-th operating point.
    ///
    /// Computed from the index rather than accumulated so that seeded runs of
    /// the same combination land on bit-identical grids.
    pub fn snr_at(&self, step_index: u32) -> f64 {
        f64::from(step_index).mul_add(self.esn0_step_db, self.esn0_start_db)
    }

    /// Stable label used for result files and log fields.
    pub fn label(&self) -> String {
        format!(
            "{}_z{}_it{}_e{}_s{}",
            self.code.structure,
            self.code.scaling,
            self.code.max_iterations,
            self.target_block_errors,
            self.seed
        )
    }
}
