use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{InstrumentKind, TradingStatus};

/// Unique identifier for an instrument
///
/// The broker's instrument uid. Used as the key of every position map
/// and in order submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(pub String);

impl InstrumentId {
    /// Create a new instrument ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for InstrumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for InstrumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Full directory record for an instrument
///
/// Point-in-time: the trading status may change between sync cycles,
/// so records are looked up fresh every cycle and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub uid: InstrumentId,
    pub name: String,
    pub ticker: String,
    pub kind: InstrumentKind,
    /// Minimum tradable multiple, in units
    pub lot: NonZeroU32,
    pub trading_status: TradingStatus,
}

impl Instrument {
    /// Lot size as a decimal, for quantity arithmetic
    pub fn lot_size(&self) -> Decimal {
        Decimal::from(self.lot.get())
    }

    pub fn is_normal_trading(&self) -> bool {
        self.trading_status.is_normal_trading()
    }

    /// Short human label: `name(TICKER)`
    pub fn label(&self) -> String {
        format!("{}({})", self.name, self.ticker)
    }

    pub fn summary(&self) -> InstrumentSummary {
        InstrumentSummary {
            uid: self.uid.clone(),
            name: self.name.clone(),
            ticker: self.ticker.clone(),
            kind: self.kind,
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Search result from the instrument directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSummary {
    pub uid: InstrumentId,
    pub name: String,
    pub ticker: String,
    pub kind: InstrumentKind,
}

impl std::fmt::Display for InstrumentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.ticker)
    }
}
