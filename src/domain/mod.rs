//! Domain layer for the BLER sweep system
//!
//! This module contains the sweep data model, the collaborator ports and the
//! domain error type.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
