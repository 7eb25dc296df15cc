pub mod config;
pub mod parameters;
pub mod sweep;

pub use config::{
    CodesConfig, Config, DecoderConfig, ExecutionConfig, LoggingConfig, Modulation, OutputConfig,
    SweepConfig,
};
pub use parameters::{CodeSpec, SweepParameters};
pub use sweep::{aggregate_sweeps, OperatingPoint, PointStatus, SweepResult, TrialOutcome};
