//! Run-time error taxonomy.
//!
//! Configuration problems are caught before a run starts (see
//! [`crate::config::ConfigError`]). Everything here is either an I/O
//! failure while writing outputs or a graph-consistency fault, which is a
//! programming error and aborts the run.

use thiserror::Error;

/// Errors that can abort a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid run configuration
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// I/O failure writing run outputs
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization failure writing the resolved run config
    #[error("toml error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// The employment network violated a structural invariant.
    /// This can only happen through a decision-engine bug, so the run
    /// aborts rather than continuing with a corrupt economy.
    #[error("employment network invariant violated: {0}")]
    InvariantViolation(String),
}
