//! Sweep progress display using indicatif
//!
//! One spinner per running sweep, grouped in a [`MultiProgress`] so that
//! parallel sweeps each keep their own line.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::domain::models::{OperatingPoint, SweepParameters, SweepResult};
use crate::domain::ports::{ObserverFactory, SweepObserver};
use crate::adapters::sinks::format_scientific;

const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {prefix:.bold} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Trials between two message refreshes
const REFRESH_EVERY: u64 = 100;

/// Create a spinner for one sweep
pub fn create_spinner(prefix: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);
    spinner.set_style(style);
    spinner.set_prefix(prefix.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Creates a [`SpinnerObserver`] per sweep
pub struct ProgressObserverFactory {
    multi: MultiProgress,
}

impl ProgressObserverFactory {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
        }
    }

    /// A factory whose spinners draw nowhere (for testing)
    pub fn hidden() -> Self {
        let multi = MultiProgress::new();
        multi.set_draw_target(ProgressDrawTarget::hidden());
        Self { multi }
    }
}

impl Default for ProgressObserverFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ObserverFactory for ProgressObserverFactory {
    fn create(&self, params: &SweepParameters) -> Box<dyn SweepObserver> {
        let spinner = self.multi.add(create_spinner(params.label()));
        Box::new(SpinnerObserver { spinner })
    }
}

/// Shows the operating point under accumulation and the last finalized one
pub struct SpinnerObserver {
    spinner: ProgressBar,
}

impl SweepObserver for SpinnerObserver {
    fn on_trial(&mut self, point: &OperatingPoint) {
        if point.trial_count() % REFRESH_EVERY == 1 {
            self.spinner.set_message(format!(
                "{:.2} dB: {} errors / {} trials",
                point.snr_db(),
                point.error_count(),
                point.trial_count()
            ));
        }
    }

    fn on_point_finalized(&mut self, point: &OperatingPoint) {
        let bler = point.bler().unwrap_or(1.0);
        let line = if point.is_degenerate() {
            format!("{:.2} dB: degenerate", point.snr_db())
        } else {
            format!(
                "{:.2} dB: BLER {} ({} trials)",
                point.snr_db(),
                format_scientific(bler),
                point.trial_count()
            )
        };
        self.spinner.set_message(line);
    }

    fn on_sweep_finished(&mut self, result: &SweepResult) {
        self.spinner.finish_with_message(format!(
            "✓ {} points, {} trials",
            result.len(),
            result.total_trials()
        ));
    }
}

impl Drop for SpinnerObserver {
    // A sweep that failed never reaches `on_sweep_finished`
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.abandon_with_message("✗ sweep failed");
        }
    }
}
