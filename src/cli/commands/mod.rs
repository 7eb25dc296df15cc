//! CLI command implementations.

pub mod codes;
pub mod config;
pub mod run;
