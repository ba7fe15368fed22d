//! Replication engine errors

use mirror_core::AccountId;
use mirror_ports::BrokerError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failure of one sync cycle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Instrument not found: {query}")]
    InstrumentNotFound { query: String },

    #[error("Instrument lookup for {query} is ambiguous: {matches} matches")]
    InstrumentAmbiguous { query: String, matches: usize },

    /// The source holds nothing tradable, so no ratio exists
    #[error("Source portfolio {account} has no tradable value")]
    EmptySourcePortfolio { account: AccountId },

    /// Destination capital over source value exceeds the decimal range
    #[error("Ratio {dst_effective_total} / {src_total} is out of range")]
    RatioOverflow {
        src_total: Decimal,
        dst_effective_total: Decimal,
    },

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),
}

impl SyncError {
    /// Whether repeating the cycle right away may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Broker(err) => err.is_transient(),
            _ => false,
        }
    }

    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            SyncError::InstrumentNotFound { .. } | SyncError::InstrumentAmbiguous { .. }
        )
    }
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Invalid engine configuration, raised at setup time
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(Decimal),

    #[error("Reserve must be within [0, 1], got {0}")]
    ReserveOutOfRange(Decimal),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
