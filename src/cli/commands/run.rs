//! Implementation of the `bler-sweep run` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::adapters::{BuiltinCodecs, FileSinkFactory};
use crate::cli::output::{output, CommandOutput, ProgressObserverFactory, TableFormatter};
use crate::domain::models::{Config, Modulation};
use crate::domain::ports::{NullObserver, ObserverFactory};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::{AggregatedCurve, ConfigurationRunner, RunReport};

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Code structures to sweep (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub structure: Vec<String>,

    /// Scaling parameters applied to every structure (comma-separated)
    #[arg(short = 'z', long, value_delimiter = ',')]
    pub scaling: Vec<u32>,

    /// RNG seeds, one sweep each (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub seed: Vec<u64>,

    /// Starting Es/N0 in dB, one per structure or one for all (comma-separated)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub start_snr: Vec<f64>,

    /// Es/N0 increment between operating points in dB
    #[arg(long)]
    pub step: Option<f64>,

    /// Stop a sweep after the first point with BLER below this value
    #[arg(long)]
    pub target_bler: Option<f64>,

    /// Block errors to collect per operating point
    #[arg(long)]
    pub target_errors: Option<u64>,

    /// Decoder iteration budget
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Message length (defaults to the code's information length)
    #[arg(long)]
    pub info_bits: Option<usize>,

    /// Symbol mapping (bpsk or qpsk)
    #[arg(long)]
    pub modulation: Option<Modulation>,

    /// Directory for result files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of sweeps run at the same time
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Disable progress spinners
    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if !self.structure.is_empty() {
            config.codes.structures.clone_from(&self.structure);
        }
        if !self.scaling.is_empty() {
            config.codes.scalings.clone_from(&self.scaling);
        }
        if !self.seed.is_empty() {
            config.sweep.seeds.clone_from(&self.seed);
        }
        if !self.start_snr.is_empty() {
            config.sweep.esn0_start_db.clone_from(&self.start_snr);
        }
        if let Some(step) = self.step {
            config.sweep.esn0_step_db = step;
        }
        if let Some(target) = self.target_bler {
            config.sweep.target_bler = target;
        }
        if let Some(errors) = self.target_errors {
            config.sweep.target_block_errors = errors;
        }
        if let Some(iterations) = self.max_iterations {
            config.decoder.max_iterations = iterations;
        }
        if self.info_bits.is_some() {
            config.codes.info_bits = self.info_bits;
        }
        if let Some(modulation) = self.modulation {
            config.modulation = modulation;
        }
        if let Some(ref dir) = self.output_dir {
            config.output.dir.clone_from(dir);
        }
        if let Some(parallel) = self.parallel {
            config.execution.parallel_sweeps = parallel;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub output_dir: PathBuf,
    #[serde(flatten)]
    pub report: RunReport,
    pub curves: Vec<AggregatedCurve>,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut sections = Vec::new();

        if self.report.sweeps.is_empty() {
            sections.push("No sweeps were run.".to_string());
        } else {
            sections.push(formatter.format_sweeps(&self.report.sweeps));
        }

        for curve in self.curves.iter().filter(|c| c.seeds.len() > 1) {
            sections.push(format!(
                "\n{} z={} pooled over seeds {:?}:",
                curve.structure, curve.scaling, curve.seeds
            ));
            sections.push(formatter.format_curve(curve));
        }

        if !self.report.skipped.is_empty() {
            sections.push(format!(
                "\nSkipped {} unsupported combination(s):",
                self.report.skipped.len()
            ));
            sections.push(formatter.format_skipped(&self.report.skipped));
        }

        sections.push(format!("\nResults written to {}", self.output_dir.display()));
        sections.join("\n")
    }
}

pub async fn execute(args: RunArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let mut config = ConfigLoader::extract(config_path).context("Failed to load configuration")?;
    args.apply(&mut config);
    ConfigLoader::validate(&config).context("Invalid configuration")?;

    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))
        .context("Failed to initialize logging")?;

    let observers: Arc<dyn ObserverFactory> = if args.no_progress || json_mode {
        Arc::new(NullObserver)
    } else {
        Arc::new(ProgressObserverFactory::new())
    };

    let runner = ConfigurationRunner::new(
        Arc::new(BuiltinCodecs::new()),
        Arc::new(FileSinkFactory::new(&config.output.dir)),
        observers,
        config.modulation,
        config.execution.parallel_sweeps,
    );

    let combinations = config
        .sweep_parameters()
        .context("Invalid sweep configuration")?;
    let report = runner
        .run(combinations)
        .await
        .context("Sweep run failed")?;

    let output_data = RunOutput {
        output_dir: config.output.dir.clone(),
        curves: report.aggregated(),
        report,
    };
    output(&output_data, json_mode);
    Ok(())
}
