//! Common test utilities for integration tests
//!
//! Provides scripted trial sources, codec factories with configurable
//! failures, and small parameter builders shared by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bler_sweep::adapters::BuiltinCodecs;
use bler_sweep::domain::errors::{DomainError, DomainResult};
use bler_sweep::domain::models::{CodeSpec, SweepParameters, TrialOutcome};
use bler_sweep::domain::ports::{
    CodecConstruction, CodecFactory, ResultSink, SinkFactory, StructureInfo,
};
use bler_sweep::services::TrialSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Sweep parameters with a repetition code and the given stopping rules.
pub fn sweep_params(target_block_errors: u64, target_bler: f64, start: f64, step: f64) -> SweepParameters {
    SweepParameters {
        code: CodeSpec {
            structure: "repetition".to_string(),
            scaling: 3,
            max_iterations: 10,
            min_sum_scale: 0.75,
            info_bits: Some(8),
        },
        target_block_errors,
        target_bler,
        esn0_start_db: start,
        esn0_step_db: step,
        seed: 1,
    }
}

/// One combination per (structure, scaling, seed), same stopping rules.
pub fn combinations(
    entries: &[(&str, u32, u64)],
    start: f64,
    info_bits: Option<usize>,
) -> Vec<SweepParameters> {
    entries
        .iter()
        .map(|&(structure, scaling, seed)| SweepParameters {
            code: CodeSpec {
                structure: structure.to_string(),
                scaling,
                max_iterations: 20,
                min_sum_scale: 0.75,
                info_bits,
            },
            target_block_errors: 3,
            target_bler: 0.3,
            esn0_start_db: start,
            esn0_step_db: 1.0,
            seed,
        })
        .collect()
}

/// Replays fixed outcome sequences, one queue per SNR value.
///
/// Panics when a queue runs dry so that a test never spins forever.
pub struct ScriptedTrials {
    script: BTreeMap<i64, VecDeque<TrialOutcome>>,
    pub calls: Vec<f64>,
}

fn snr_key(snr_db: f64) -> i64 {
    (snr_db * 1000.0).round() as i64
}

impl ScriptedTrials {
    /// `true` is a successful trial, `false` a block error.
    pub fn new(script: &[(f64, &[bool])]) -> Self {
        Self {
            script: script
                .iter()
                .map(|&(snr, outcomes)| {
                    let queue = outcomes.iter().map(|&ok| TrialOutcome::from(ok)).collect();
                    (snr_key(snr), queue)
                })
                .collect(),
            calls: Vec::new(),
        }
    }

    /// Outcomes not consumed at `snr_db`.
    pub fn remaining(&self, snr_db: f64) -> usize {
        self.script.get(&snr_key(snr_db)).map_or(0, VecDeque::len)
    }
}

impl TrialSource for ScriptedTrials {
    fn run_trial(&mut self, snr_db: f64) -> DomainResult<TrialOutcome> {
        self.calls.push(snr_db);
        let outcome = self
            .script
            .get_mut(&snr_key(snr_db))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no scripted outcome left at {snr_db} dB"));
        Ok(outcome)
    }
}

/// Random outcomes whose failure probability halves at every SNR step.
pub struct DecayingTrials {
    rng: StdRng,
    start: f64,
    step: f64,
    initial_failure: f64,
}

impl DecayingTrials {
    pub fn new(seed: u64, start: f64, step: f64, initial_failure: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            start,
            step,
            initial_failure,
        }
    }
}

impl TrialSource for DecayingTrials {
    fn run_trial(&mut self, snr_db: f64) -> DomainResult<TrialOutcome> {
        let steps = ((snr_db - self.start) / self.step).round();
        let p_fail = self.initial_failure * 0.5f64.powf(steps);
        Ok(TrialOutcome::from(self.rng.gen::<f64>() >= p_fail))
    }
}

/// Wraps the built-in codecs, marking chosen combinations unsupported and
/// counting construction attempts.
pub struct ScriptedCodecs {
    inner: BuiltinCodecs,
    unsupported: HashSet<(String, u32)>,
    failing: HashSet<String>,
    pub builds: Arc<AtomicUsize>,
}

impl ScriptedCodecs {
    pub fn new() -> Self {
        Self {
            inner: BuiltinCodecs::new(),
            unsupported: HashSet::new(),
            failing: HashSet::new(),
            builds: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unsupported(mut self, structure: &str, scaling: u32) -> Self {
        self.unsupported.insert((structure.to_string(), scaling));
        self
    }

    /// Construction of `structure` fails with a non-classified error.
    pub fn failing(mut self, structure: &str) -> Self {
        self.failing.insert(structure.to_string());
        self
    }
}

impl CodecFactory for ScriptedCodecs {
    fn build(&self, spec: &CodeSpec) -> DomainResult<CodecConstruction> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&spec.structure) {
            return Err(DomainError::SweepWorker(format!(
                "construction of {} exploded",
                spec.structure
            )));
        }
        if self
            .unsupported
            .contains(&(spec.structure.clone(), spec.scaling))
        {
            return Ok(CodecConstruction::Unsupported {
                reason: "marked unsupported by test".to_string(),
            });
        }
        self.inner.build(spec)
    }

    fn structures(&self) -> Vec<StructureInfo> {
        self.inner.structures()
    }
}

/// Refuses to open a sink for one seed.
pub struct FailingSinkFactory {
    pub seed: u64,
}

impl SinkFactory for FailingSinkFactory {
    fn open(&self, params: &SweepParameters) -> DomainResult<Box<dyn ResultSink>> {
        if params.seed == self.seed {
            return Err(DomainError::ResultFile {
                path: format!("/unwritable/{}.tsv", params.label()).into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        Ok(Box::new(DiscardSink))
    }
}

struct DiscardSink;

impl ResultSink for DiscardSink {
    fn record(&mut self, _snr_db: f64, _bler: f64) -> DomainResult<()> {
        Ok(())
    }
}

/// Sink writing into a shared vector, for direct controller tests.
#[derive(Default)]
pub struct VecSink {
    pub records: Vec<(f64, f64)>,
    pub finished: bool,
}

impl ResultSink for VecSink {
    fn record(&mut self, snr_db: f64, bler: f64) -> DomainResult<()> {
        self.records.push((snr_db, bler));
        Ok(())
    }

    fn finish(&mut self) -> DomainResult<()> {
        self.finished = true;
        Ok(())
    }
}
