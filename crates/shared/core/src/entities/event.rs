use serde::{Deserialize, Serialize};

use super::AccountId;
use crate::instruments::InstrumentId;
use crate::values::{Money, Timestamp};

/// Security balance line of a position-change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityLine {
    pub instrument_id: InstrumentId,
    /// Settled balance in units
    pub balance: i64,
    /// Units locked by pending orders or settlement
    pub blocked: i64,
}

impl SecurityLine {
    pub fn is_unblocked(&self) -> bool {
        self.blocked == 0
    }
}

/// Cash balance line of a position-change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyLine {
    pub available: Money,
    pub blocked: Money,
}

/// Position state of one account after a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionsUpdate {
    pub account_id: AccountId,
    pub securities: Vec<SecurityLine>,
    pub money: Vec<MoneyLine>,
}

/// One notification from the position-change feed
///
/// The payload may be absent (heartbeats, subscription acknowledgements).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionEvent {
    pub position: Option<PositionsUpdate>,
    pub received_at: Timestamp,
}

impl PositionEvent {
    pub fn new(position: Option<PositionsUpdate>, received_at: Timestamp) -> Self {
        Self {
            position,
            received_at,
        }
    }

    /// Account the payload refers to, if any
    pub fn account_id(&self) -> Option<&AccountId> {
        self.position.as_ref().map(|p| &p.account_id)
    }
}
