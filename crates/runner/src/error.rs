//! Runner errors

use mirror_core::AccountId;
use mirror_engine::{ConfigError, SyncError};
use mirror_gateway::SeedError;
use mirror_ports::BrokerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Paper broker seed error: {0}")]
    Seed(#[from] SeedError),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("No {0} account configured")]
    MissingAccount(&'static str),

    #[error("Source and destination are the same account: {0}")]
    SameAccount(AccountId),

    #[error("No paper broker seed configured")]
    MissingSeed,
}

pub type RunnerResult<T> = std::result::Result<T, RunnerError>;
