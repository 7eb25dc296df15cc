//! Result sink port - persistence of finalized operating points.

use crate::domain::errors::DomainResult;
use crate::domain::models::SweepParameters;

/// Receives `(snr, bler)` records of informative operating points.
pub trait ResultSink: Send {
    fn record(&mut self, snr_db: f64, bler: f64) -> DomainResult<()>;

    /// Called once after the sweep terminated.
    fn finish(&mut self) -> DomainResult<()> {
        Ok(())
    }
}

/// Opens one sink per sweep.
pub trait SinkFactory: Send + Sync {
    fn open(&self, params: &SweepParameters) -> DomainResult<Box<dyn ResultSink>>;
}
