//! Error type for the fallible edges of the dashboard.
//!
//! Per-line problems never show up here: they are absorbed by the
//! ingestion pipeline (see [`crate::ingest::Discard`]).

use thiserror::Error;

/// Errors that stop the dashboard from starting or running.
#[derive(Debug, Error)]
pub enum Error {
    /// Terminal setup, drawing, or input failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),

    /// The reader thread could not be started.
    #[error("failed to spawn reader thread: {0}")]
    ReaderSpawn(#[source] std::io::Error),

    /// A command-line value was rejected.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
