//! Per-configuration SNR sweep.
//!
//! Starting at `esn0_start_db`, each step probes one operating point to
//! completion (degenerate abort or block-error target reached), records it if
//! it is informative, and advances by `esn0_step_db`. The sweep terminates at
//! the first finalized point whose BLER is strictly below `target_bler`.
//!
//! There is no upper SNR bound: a configuration whose BLER never falls below
//! the target keeps the sweep running. Callers that need a ceiling must impose
//! it from outside.

use tracing::{debug, info, info_span};

use crate::domain::errors::DomainResult;
use crate::domain::models::{OperatingPoint, SweepParameters, SweepResult};
use crate::domain::ports::{ResultSink, SweepObserver};
use crate::services::convergence_tracker::ConvergenceTracker;
use crate::services::early_abort::EarlyAbortPolicy;
use crate::services::trial_runner::TrialSource;

/// Drives one sweep for one set of [`SweepParameters`].
#[derive(Debug, Clone, Copy)]
pub struct SweepController<'a> {
    params: &'a SweepParameters,
}

impl<'a> SweepController<'a> {
    pub const fn new(params: &'a SweepParameters) -> Self {
        Self { params }
    }

    /// Run the sweep to its terminal condition.
    ///
    /// Informative points (converged, BLER < 1.0) are written to `sink` as
    /// they finalize; the returned [`SweepResult`] also holds degenerate and
    /// uninformative points.
    pub fn run(
        &self,
        trials: &mut dyn TrialSource,
        sink: &mut dyn ResultSink,
        observer: &mut dyn SweepObserver,
    ) -> DomainResult<SweepResult> {
        self.params.validate()?;

        let label = self.params.label();
        let span = info_span!("sweep", sweep = %label);
        let _enter = span.enter();

        let mut policy = EarlyAbortPolicy::new();
        let mut result = SweepResult::new();
        let mut step_index: u32 = 0;

        loop {
            let snr_db = self.params.snr_at(step_index);
            let point = self.probe(step_index, snr_db, trials, &mut policy, observer)?;
            observer.on_point_finalized(&point);

            let bler = point.bler().unwrap_or(1.0);
            if point.is_recordable() {
                sink.record(snr_db, bler)?;
                info!(
                    snr_db,
                    bler,
                    trials = point.trial_count(),
                    errors = point.error_count(),
                    "Operating point converged"
                );
            } else if point.is_degenerate() {
                debug!(snr_db, "Degenerate operating point skipped");
            } else {
                debug!(
                    snr_db,
                    trials = point.trial_count(),
                    "Operating point converged at BLER 1.0, not recorded"
                );
            }

            result.push(point);
            if bler < self.params.target_bler {
                break;
            }
            step_index += 1;
        }

        sink.finish()?;
        observer.on_sweep_finished(&result);
        info!(
            points = result.len(),
            degenerate = result.degenerate_count(),
            total_trials = result.total_trials(),
            "Sweep complete"
        );
        Ok(result)
    }

    /// Accumulate a single operating point to completion.
    fn probe(
        &self,
        step_index: u32,
        snr_db: f64,
        trials: &mut dyn TrialSource,
        policy: &mut EarlyAbortPolicy,
        observer: &mut dyn SweepObserver,
    ) -> DomainResult<OperatingPoint> {
        let mut tracker = ConvergenceTracker::new(
            OperatingPoint::new(step_index, snr_db),
            self.params.target_block_errors,
        );

        let first = trials.run_trial(snr_db)?;
        tracker.record(first);
        observer.on_trial(tracker.point());

        if policy.should_abort_point(first) {
            return Ok(tracker.into_degenerate());
        }

        while !tracker.is_point_converged() {
            let outcome = trials.run_trial(snr_db)?;
            tracker.record(outcome);
            observer.on_trial(tracker.point());
        }

        Ok(tracker.into_converged())
    }
}
