//! Error types for the parts of the crate that touch data outside the core.
//!
//! Sampling and estimation are total over their inputs and never fail; these
//! errors cover loading the embedded word bank and the result store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a word bank.
#[derive(Debug, Error)]
pub enum BankError {
    /// No bank with this file name is embedded in the binary.
    #[error("word bank not found: {0}")]
    NotFound(String),

    /// The bank file is not valid UTF-8.
    #[error("word bank {0} is not valid UTF-8")]
    NotUtf8(String),

    /// The bank file is not valid JSON for the bank schema.
    #[error("unable to parse word bank: {0}")]
    Parse(#[from] serde_json::Error),

    /// The bank parsed but violates a structural rule.
    #[error("invalid word bank: {0}")]
    Invalid(String),
}

/// Errors raised by the result store and history export.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
