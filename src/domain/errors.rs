//! Domain errors for the BLER sweep system.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-level errors that can occur while setting up or running sweeps.
///
/// An unsupported (structure, scaling) combination is deliberately absent:
/// it is reported through [`CodecConstruction::Unsupported`] so callers can
/// skip it without inspecting error messages.
///
/// [`CodecConstruction::Unsupported`]: crate::domain::ports::CodecConstruction::Unsupported
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown code structure: {0}")]
    UnknownStructure(String),

    #[error("Invalid code input: expected {expected} positions, got {actual}")]
    InvalidCodeInput { expected: usize, actual: usize },

    #[error("Invalid sweep parameters: {0}")]
    InvalidParameters(String),

    #[error("Failed to open result file {path}: {source}")]
    ResultFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write result record: {0}")]
    ResultWrite(#[from] std::io::Error),

    #[error("Sweep worker failed: {0}")]
    SweepWorker(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<tokio::task::JoinError> for DomainError {
    fn from(err: tokio::task::JoinError) -> Self {
        DomainError::SweepWorker(err.to_string())
    }
}

impl From<tokio::sync::AcquireError> for DomainError {
    fn from(err: tokio::sync::AcquireError) -> Self {
        DomainError::SweepWorker(err.to_string())
    }
}
