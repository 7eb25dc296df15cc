//! Runs the sweep for every configured (structure, scaling, seed) combination.
//!
//! Combinations are visited in their configured order. A combination whose
//! codec reports [`CodecConstruction::Unsupported`] is logged with
//! [`tracing::warn`] and skipped: no sweep runs and no result file is opened.
//! Any other construction or sweep failure is fatal and ends the run.
//!
//! Sweeps execute on blocking workers. At most `parallel_sweeps` run at once;
//! with a single permit the next combination is only constructed once the
//! previous sweep has finished. Each sweep owns its RNG, so scheduling never
//! changes outcomes.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    aggregate_sweeps, Modulation, OperatingPoint, SweepParameters, SweepResult,
};
use crate::domain::ports::{Codec, CodecConstruction, CodecFactory, ObserverFactory, SinkFactory};
use crate::services::sweep_controller::SweepController;
use crate::services::trial_runner::TrialRunner;

/// A combination skipped because its codec cannot be built.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedCombination {
    pub structure: String,
    pub scaling: u32,
    pub seed: u64,
    pub reason: String,
}

/// One finished sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub params: SweepParameters,
    pub result: SweepResult,
}

/// Seed-pooled curve for one (structure, scaling) combination.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedCurve {
    pub structure: String,
    pub scaling: u32,
    pub esn0_start_db: f64,
    pub seeds: Vec<u64>,
    pub points: Vec<OperatingPoint>,
}

/// Everything a run produced, in configuration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub sweeps: Vec<SweepReport>,
    pub skipped: Vec<SkippedCombination>,
}

impl RunReport {
    /// Pool seeded runs of each (structure, scaling) combination.
    ///
    /// Only sweeps whose parameters differ in nothing but the seed share a
    /// curve, and a seed contributes once per curve.
    pub fn aggregated(&self) -> Vec<AggregatedCurve> {
        let mut groups: Vec<(SweepParameters, Vec<u64>, Vec<SweepResult>)> = Vec::new();

        for sweep in &self.sweeps {
            let key = SweepParameters {
                seed: 0,
                ..sweep.params.clone()
            };
            let index = match groups.iter().position(|(k, _, _)| *k == key) {
                Some(index) => index,
                None => {
                    groups.push((key, Vec::new(), Vec::new()));
                    groups.len() - 1
                }
            };
            let (_, seeds, results) = &mut groups[index];
            if seeds.contains(&sweep.params.seed) {
                continue;
            }
            seeds.push(sweep.params.seed);
            results.push(sweep.result.clone());
        }

        groups
            .into_iter()
            .map(|(key, seeds, results)| AggregatedCurve {
                structure: key.code.structure,
                scaling: key.code.scaling,
                esn0_start_db: key.esn0_start_db,
                seeds,
                points: aggregate_sweeps(&results),
            })
            .collect()
    }
}

/// Iterates combinations and dispatches their sweeps.
pub struct ConfigurationRunner {
    codecs: Arc<dyn CodecFactory>,
    sinks: Arc<dyn SinkFactory>,
    observers: Arc<dyn ObserverFactory>,
    modulation: Modulation,
    parallel_sweeps: usize,
}

impl ConfigurationRunner {
    pub fn new(
        codecs: Arc<dyn CodecFactory>,
        sinks: Arc<dyn SinkFactory>,
        observers: Arc<dyn ObserverFactory>,
        modulation: Modulation,
        parallel_sweeps: usize,
    ) -> Self {
        Self {
            codecs,
            sinks,
            observers,
            modulation,
            parallel_sweeps: parallel_sweeps.max(1),
        }
    }

    /// Run every combination in `combinations` and collect the reports.
    ///
    /// On a fatal error, sweeps already running are allowed to finish, no
    /// new combination is started, and the earliest error (in configuration
    /// order) is returned. Two combinations sharing a result-file label are
    /// rejected before any sweep starts.
    pub async fn run(&self, combinations: Vec<SweepParameters>) -> DomainResult<RunReport> {
        let mut labels = HashSet::new();
        if let Some(duplicate) = combinations.iter().find(|p| !labels.insert(p.label())) {
            return Err(DomainError::InvalidParameters(format!(
                "combination {} is scheduled more than once",
                duplicate.label()
            )));
        }

        let semaphore = Arc::new(Semaphore::new(self.parallel_sweeps));
        let failed = Arc::new(AtomicBool::new(false));
        let mut handles: Vec<(usize, JoinHandle<DomainResult<SweepReport>>)> = Vec::new();
        let mut errors: Vec<(usize, DomainError)> = Vec::new();
        let mut skipped = Vec::new();

        for (index, params) in combinations.into_iter().enumerate() {
            let permit = semaphore.clone().acquire_owned().await?;
            if failed.load(Ordering::Acquire) {
                break;
            }

            let codec = match self.codecs.build(&params.code) {
                Ok(CodecConstruction::Ready(codec)) => codec,
                Ok(CodecConstruction::Unsupported { reason }) => {
                    tracing::warn!(
                        structure = %params.code.structure,
                        scaling = params.code.scaling,
                        seed = params.seed,
                        reason = %reason,
                        "Skipping unsupported code combination"
                    );
                    skipped.push(SkippedCombination {
                        structure: params.code.structure.clone(),
                        scaling: params.code.scaling,
                        seed: params.seed,
                        reason,
                    });
                    continue;
                }
                Err(e) => {
                    tracing::error!(
                        structure = %params.code.structure,
                        scaling = params.code.scaling,
                        error = %e,
                        "Code construction failed"
                    );
                    errors.push((index, e));
                    break;
                }
            };

            let sinks = Arc::clone(&self.sinks);
            let observers = Arc::clone(&self.observers);
            let failed = Arc::clone(&failed);
            let modulation = self.modulation;

            let handle = tokio::task::spawn_blocking(move || {
                let result = run_sweep(&params, codec, modulation, sinks.as_ref(), observers.as_ref());
                if result.is_err() {
                    failed.store(true, Ordering::Release);
                }
                drop(permit);
                result.map(|result| SweepReport { params, result })
            });
            handles.push((index, handle));
        }

        let mut sweeps = Vec::with_capacity(handles.len());
        for (index, handle) in handles {
            match handle.await {
                Ok(Ok(report)) => sweeps.push(report),
                Ok(Err(e)) => errors.push((index, e)),
                Err(join_error) => errors.push((index, join_error.into())),
            }
        }

        if let Some((_, error)) = errors.into_iter().min_by_key(|(index, _)| *index) {
            return Err(error);
        }

        tracing::info!(
            completed = sweeps.len(),
            skipped = skipped.len(),
            "All combinations processed"
        );
        Ok(RunReport { sweeps, skipped })
    }
}

/// Execute one sweep on the current (blocking) thread.
fn run_sweep(
    params: &SweepParameters,
    codec: Codec,
    modulation: Modulation,
    sinks: &dyn SinkFactory,
    observers: &dyn ObserverFactory,
) -> DomainResult<SweepResult> {
    let info_bits = params.code.info_bits.unwrap_or_else(|| codec.encoder.input_len());
    let mut trials = TrialRunner::seeded(codec, modulation, params.seed, info_bits)?;
    let mut sink = sinks.open(params)?;
    let mut observer = observers.create(params);

    tracing::info!(
        structure = %params.code.structure,
        scaling = params.code.scaling,
        seed = params.seed,
        info_bits,
        start_snr_db = params.esn0_start_db,
        "Starting sweep"
    );
    SweepController::new(params).run(&mut trials, sink.as_mut(), observer.as_mut())
}
