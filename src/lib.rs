//! bler-sweep - adaptive Monte Carlo block-error-rate sweeps
//!
//! Measures the block error rate (BLER) of error-correcting codes over a noisy
//! channel as a function of Es/N0. Each operating point accumulates trials
//! until a fixed number of block errors has been observed; a sweep climbs the
//! SNR grid until the BLER falls below a target.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, collaborator ports, errors
//! - **Service Layer** (`services`): trial execution and the sweep controllers
//! - **Adapters** (`adapters`): codes, modems, the AWGN channel, result sinks
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bler_sweep::adapters::{BuiltinCodecs, FileSinkFactory};
//! use bler_sweep::domain::models::Config;
//! use bler_sweep::domain::ports::NullObserver;
//! use bler_sweep::services::ConfigurationRunner;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default();
//! let runner = ConfigurationRunner::new(
//!     Arc::new(BuiltinCodecs::new()),
//!     Arc::new(FileSinkFactory::new("results")),
//!     Arc::new(NullObserver),
//!     config.modulation,
//!     config.execution.parallel_sweeps,
//! );
//! let report = runner.run(config.sweep_parameters()?).await?;
//! println!("{} sweeps finished", report.sweeps.len());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Config, Modulation, OperatingPoint, PointStatus, SweepParameters, SweepResult, TrialOutcome,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ConfigurationRunner, RunReport, SweepController, TrialRunner, TrialSource};
