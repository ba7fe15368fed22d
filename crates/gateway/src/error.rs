//! Error types for the gateway crate

use thiserror::Error;

/// Errors loading or validating a paper broker seed
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown instrument {instrument} in account {account}")]
    UnknownInstrument { account: String, instrument: String },

    #[error("Duplicate account: {0}")]
    DuplicateAccount(String),

    #[error("Invalid seed: {0}")]
    Invalid(String),
}
