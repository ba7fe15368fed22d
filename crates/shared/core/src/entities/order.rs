use serde::{Deserialize, Serialize};

use crate::instruments::InstrumentId;

/// Order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => f.write_str("buy"),
            Direction::Sell => f.write_str("sell"),
        }
    }
}

/// How the gateway should execute an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStyle {
    /// Fill at the best price currently available on the exchange
    #[default]
    BestPrice,
}

/// Broker-assigned order identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An order the diff engine wants placed on the destination account
///
/// Produced fresh every cycle and handed to the order gateway; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub instrument_id: InstrumentId,
    /// Number of lots, always positive
    pub lots: u64,
    pub direction: Direction,
    pub style: ExecutionStyle,
}

impl OrderIntent {
    pub fn buy(instrument_id: InstrumentId, lots: u64) -> Self {
        Self {
            instrument_id,
            lots,
            direction: Direction::Buy,
            style: ExecutionStyle::BestPrice,
        }
    }

    pub fn sell(instrument_id: InstrumentId, lots: u64) -> Self {
        Self {
            instrument_id,
            lots,
            direction: Direction::Sell,
            style: ExecutionStyle::BestPrice,
        }
    }
}

impl std::fmt::Display for OrderIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} lots of {} ({:?})",
            self.direction, self.lots, self.instrument_id, self.style
        )
    }
}
