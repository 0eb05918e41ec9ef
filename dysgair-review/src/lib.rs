//! Dysgair review tooling
//!
//! Configuration, batch recalculation and the command-line front end over
//! `dysgair-metrics`. Exposed as a library for integration testing.

pub mod batch;
pub mod cli;
pub mod config;
pub mod version;

pub use batch::{run_batch, BatchSummary, ClassificationCounts, ReviewError};
pub use config::ReviewConfig;
