//! Observer port - side channel for progress and visualization.
//!
//! Observers see every trial and every finalized point but cannot influence
//! the controller.

use crate::domain::models::{OperatingPoint, SweepParameters, SweepResult};

/// Callbacks invoked by the sweep controller. All methods default to no-ops.
pub trait SweepObserver: Send {
    /// After each trial, with the partially accumulated point.
    fn on_trial(&mut self, _point: &OperatingPoint) {}

    /// After a point was finalized (degenerate or converged).
    fn on_point_finalized(&mut self, _point: &OperatingPoint) {}

    /// After the sweep reached its terminal condition.
    fn on_sweep_finished(&mut self, _result: &SweepResult) {}
}

/// Creates one observer per sweep.
pub trait ObserverFactory: Send + Sync {
    fn create(&self, params: &SweepParameters) -> Box<dyn SweepObserver>;
}

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SweepObserver for NullObserver {}

impl ObserverFactory for NullObserver {
    fn create(&self, _params: &SweepParameters) -> Box<dyn SweepObserver> {
        Box::new(Self)
    }
}
