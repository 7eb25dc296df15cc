use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::parameters::{CodeSpec, SweepParameters};
use crate::domain::errors::{DomainError, DomainResult};

/// Main configuration structure for a BLER sweep run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Code families and scaling parameters to sweep
    #[serde(default)]
    pub codes: CodesConfig,

    /// Decoder settings shared by every combination
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Stopping rules, SNR grid and seeds
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Symbol mapping used on the channel
    #[serde(default)]
    pub modulation: Modulation,

    /// Result file output
    #[serde(default)]
    pub output: OutputConfig,

    /// Worker scheduling
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Starting SNR for the structure at `position`, broadcasting a single
    /// configured value to every structure.
    pub fn start_snr_for(&self, position: usize) -> Option<f64> {
        match self.sweep.esn0_start_db.as_slice() {
            [single] => Some(*single),
            starts => starts.get(position).copied(),
        }
    }

    /// Expand the run parameters into one [`SweepParameters`] per
    /// (structure, scaling, seed), outer loop structure, then scaling, then seed.
    ///
    /// Fails when a structure has no starting SNR or when two combinations
    /// would share a result-file label.
    pub fn sweep_parameters(&self) -> DomainResult<Vec<SweepParameters>> {
        let mut all = Vec::new();
        let mut labels = HashSet::new();
        for (position, structure) in self.codes.structures.iter().enumerate() {
            let start = self.start_snr_for(position).ok_or_else(|| {
                DomainError::InvalidParameters(format!(
                    "no starting SNR for structure {structure} at position {position} \
                     ({} values for {} structures)",
                    self.sweep.esn0_start_db.len(),
                    self.codes.structures.len()
                ))
            })?;
            for &scaling in &self.codes.scalings {
                for &seed in &self.sweep.seeds {
                    let params = SweepParameters {
                        code: CodeSpec {
                            structure: structure.clone(),
                            scaling,
                            max_iterations: self.decoder.max_iterations,
                            min_sum_scale: self.decoder.min_sum_scale,
                            info_bits: self.codes.info_bits,
                        },
                        target_block_errors: self.sweep.target_block_errors,
                        target_bler: self.sweep.target_bler,
                        esn0_start_db: start,
                        esn0_step_db: self.sweep.esn0_step_db,
                        seed,
                    };
                    if !labels.insert(params.label()) {
                        return Err(DomainError::InvalidParameters(format!(
                            "combination {} is configured more than once",
                            params.label()
                        )));
                    }
                    all.push(params);
                }
            }
        }
        Ok(all)
    }
}

/// Code selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CodesConfig {
    /// Code-structure identifiers, swept in order
    #[serde(default = "default_structures")]
    pub structures: Vec<String>,

    /// Scaling parameters applied to every structure
    #[serde(default = "default_scalings")]
    pub scalings: Vec<u32>,

    /// Message length; unset means the code's full information length
    #[serde(default)]
    pub info_bits: Option<usize>,
}

fn default_structures() -> Vec<String> {
    vec!["qc-r12".to_string()]
}

fn default_scalings() -> Vec<u32> {
    vec![16, 32]
}

impl Default for CodesConfig {
    fn default() -> Self {
        Self {
            structures: default_structures(),
            scalings: default_scalings(),
            info_bits: None,
        }
    }
}

/// Decoder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DecoderConfig {
    /// Iteration budget per decoded block
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Normalization applied to min-sum check-to-variable messages
    #[serde(default = "default_min_sum_scale")]
    pub min_sum_scale: f64,
}

const fn default_max_iterations() -> u32 {
    20
}

const fn default_min_sum_scale() -> f64 {
    0.75
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            min_sum_scale: default_min_sum_scale(),
        }
    }
}

/// Sweep stopping rules and SNR grid
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SweepConfig {
    /// Block errors collected per operating point
    #[serde(default = "default_target_block_errors")]
    pub target_block_errors: u64,

    /// A sweep stops after the first point with BLER strictly below this
    #[serde(default = "default_target_bler")]
    pub target_bler: f64,

    /// Starting Es/N0 in dB, one per structure (or one for all)
    #[serde(default = "default_esn0_start_db")]
    pub esn0_start_db: Vec<f64>,

    /// Es/N0 increment between operating points in dB
    #[serde(default = "default_esn0_step_db")]
    pub esn0_step_db: f64,

    /// RNG seeds; every seed is an independent sweep
    #[serde(default = "default_seeds")]
    pub seeds: Vec<u64>,
}

const fn default_target_block_errors() -> u64 {
    50
}

const fn default_target_bler() -> f64 {
    1e-2
}

fn default_esn0_start_db() -> Vec<f64> {
    vec![-2.0]
}

const fn default_esn0_step_db() -> f64 {
    0.25
}

fn default_seeds() -> Vec<u64> {
    vec![1]
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            target_block_errors: default_target_block_errors(),
            target_bler: default_target_bler(),
            esn0_start_db: default_esn0_start_db(),
            esn0_step_db: default_esn0_step_db(),
            seeds: default_seeds(),
        }
    }
}

/// Symbol mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modulation {
    #[default]
    Bpsk,
    Qpsk,
}

impl Modulation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bpsk => "bpsk",
            Self::Qpsk => "qpsk",
        }
    }
}

impl std::fmt::Display for Modulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Modulation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bpsk" => Ok(Self::Bpsk),
            "qpsk" => Ok(Self::Qpsk),
            other => Err(format!("unknown modulation '{other}' (expected bpsk or qpsk)")),
        }
    }
}

/// Result output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputConfig {
    /// Directory receiving one result file per sweep
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Worker scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExecutionConfig {
    /// Sweeps allowed to run at the same time (1 = strictly sequential)
    #[serde(default = "default_parallel_sweeps")]
    pub parallel_sweeps: usize,
}

const fn default_parallel_sweeps() -> usize {
    1
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            parallel_sweeps: default_parallel_sweeps(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional directory for rolling JSON log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_log_rotation(),
        }
    }
}
