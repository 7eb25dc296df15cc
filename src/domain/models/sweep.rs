//! Operating points and sweep results.
//!
//! An [`OperatingPoint`] is one SNR value under simulation together with its
//! trial and block-error counts. Points are created by the sweep controller,
//! mutated only while their convergence tracker accumulates trials, and are
//! frozen once finalized. A [`SweepResult`] is the append-only, SNR-ordered
//! sequence of finalized points for one code configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TrialOutcome
// ---------------------------------------------------------------------------

/// Result of one end-to-end trial.
///
/// `Success` means the recovered information bits equal the transmitted ones
/// bit for bit. Any mismatch, even a single bit, is a `BlockError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialOutcome {
    Success,
    BlockError,
}

impl TrialOutcome {
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    pub const fn is_error(self) -> bool {
        matches!(self, Self::BlockError)
    }
}

impl From<bool> for TrialOutcome {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::BlockError
        }
    }
}

// ---------------------------------------------------------------------------
// OperatingPoint
// ---------------------------------------------------------------------------

/// Lifecycle state of an operating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointStatus {
    /// Trials are still being drawn.
    Accumulating,
    /// Aborted after a single failing first trial; BLER is pinned to 1.0.
    Degenerate,
    /// Reached the target block-error count.
    Converged,
}

/// One SNR value within a sweep, with its accumulated counts.
///
/// Invariant: `error_count <= trial_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    step_index: u32,
    snr_db: f64,
    trial_count: u64,
    error_count: u64,
    status: PointStatus,
}

impl OperatingPoint {
    /// Create an empty point at `snr_db`, the `step_index`-th SNR of its sweep.
    pub const fn new(step_index: u32, snr_db: f64) -> Self {
        Self {
            step_index,
            snr_db,
            trial_count: 0,
            error_count: 0,
            status: PointStatus::Accumulating,
        }
    }

    pub const fn step_index(&self) -> u32 {
        self.step_index
    }

    pub const fn snr_db(&self) -> f64 {
        self.snr_db
    }

    pub const fn trial_count(&self) -> u64 {
        self.trial_count
    }

    pub const fn error_count(&self) -> u64 {
        self.error_count
    }

    pub const fn status(&self) -> PointStatus {
        self.status
    }

    pub fn is_finalized(&self) -> bool {
        self.status != PointStatus::Accumulating
    }

    pub fn is_degenerate(&self) -> bool {
        self.status == PointStatus::Degenerate
    }

    /// Block error rate, or `None` while no trial has been counted.
    ///
    /// Degenerate points always report exactly 1.0.
    pub fn bler(&self) -> Option<f64> {
        match self.status {
            PointStatus::Degenerate => Some(1.0),
            _ if self.trial_count == 0 => None,
            _ => Some(self.error_count as f64 / self.trial_count as f64),
        }
    }

    /// Whether this point belongs in a result sink: converged and informative.
    pub fn is_recordable(&self) -> bool {
        self.status == PointStatus::Converged && self.bler().is_some_and(|bler| bler < 1.0)
    }

    pub(crate) fn record(&mut self, outcome: TrialOutcome) {
        debug_assert!(!self.is_finalized(), "finalized points are immutable");
        self.trial_count += 1;
        if outcome.is_error() {
            self.error_count += 1;
        }
    }

    pub(crate) fn finalize(&mut self, status: PointStatus) {
        debug_assert!(status != PointStatus::Accumulating);
        self.status = status;
    }
}

// ---------------------------------------------------------------------------
// SweepResult
// ---------------------------------------------------------------------------

/// Finalized operating points of one sweep, in strictly increasing SNR order.
///
/// Degenerate points are kept so the whole trajectory can be inspected; only
/// [`recorded`](Self::recorded) points are ever written to a result sink.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    points: Vec<OperatingPoint>,
}

impl SweepResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, point: OperatingPoint) {
        debug_assert!(point.is_finalized());
        debug_assert!(self
            .points
            .last()
            .is_none_or(|last| last.snr_db() < point.snr_db()));
        self.points.push(point);
    }

    /// All finalized points, degenerate ones included.
    pub fn points(&self) -> &[OperatingPoint] {
        &self.points
    }

    /// Points that were persisted: converged with BLER below 1.0.
    pub fn recorded(&self) -> impl Iterator<Item = &OperatingPoint> {
        self.points.iter().filter(|p| p.is_recordable())
    }

    pub fn last(&self) -> Option<&OperatingPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn degenerate_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_degenerate()).count()
    }

    pub fn total_trials(&self) -> u64 {
        self.points.iter().map(OperatingPoint::trial_count).sum()
    }
}

/// Pool the counts of several seeded runs of the same combination.
///
/// Converged points taken at the same SNR have their trial and error counts
/// summed before the BLER is recomputed. Degenerate points carry no
/// statistical evidence and are ignored. The result is ordered by SNR.
pub fn aggregate_sweeps(results: &[SweepResult]) -> Vec<OperatingPoint> {
    // The grid is computed from the step index, so equal SNRs are bit-identical
    let mut pooled: BTreeMap<u64, OperatingPoint> = BTreeMap::new();

    for point in results
        .iter()
        .flat_map(SweepResult::points)
        .filter(|p| p.status() == PointStatus::Converged)
    {
        let entry = pooled.entry(point.snr_db().to_bits()).or_insert_with(|| {
            let mut empty = OperatingPoint::new(point.step_index(), point.snr_db());
            empty.finalize(PointStatus::Converged);
            empty
        });
        entry.trial_count += point.trial_count();
        entry.error_count += point.error_count();
    }

    let mut points: Vec<OperatingPoint> = pooled.into_values().collect();
    points.sort_by(|a, b| a.snr_db().total_cmp(&b.snr_db()));
    points
}
