//! Error types for the CLI.

use thiserror::Error;

use solemate_core::LedgerError;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Top-level command error.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading or writing records failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A ledger rule rejected the change.
    #[error("{0}")]
    Ledger(#[from] LedgerError),

    /// Writing command output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Rendering JSON output failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Argument combination the parser cannot catch.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
