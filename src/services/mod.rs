//! Service layer - the adaptive Monte Carlo sweep core.
//!
//! Leaves first: [`TrialRunner`] executes single trials, [`EarlyAbortPolicy`]
//! and [`ConvergenceTracker`] decide when an operating point is done,
//! [`SweepController`] walks the SNR grid of one configuration, and
//! [`ConfigurationRunner`] dispatches sweeps for every configured combination.

pub mod configuration_runner;
pub mod convergence_tracker;
pub mod early_abort;
pub mod sweep_controller;
pub mod trial_runner;

pub use configuration_runner::{
    AggregatedCurve, ConfigurationRunner, RunReport, SkippedCombination, SweepReport,
};
pub use convergence_tracker::ConvergenceTracker;
pub use early_abort::EarlyAbortPolicy;
pub use sweep_controller::SweepController;
pub use trial_runner::{TrialRunner, TrialSource};
