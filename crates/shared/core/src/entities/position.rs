use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::AccountId;
use crate::instruments::{InstrumentId, InstrumentKind};
use crate::values::{Money, Price, Quantity, format_decimal};

/// Fractional digits kept for position values (the broker's nano resolution)
const VALUE_SCALE: u32 = 9;

/// One line of a portfolio snapshot
///
/// Read fresh from the portfolio source every sync cycle and never mutated;
/// each cycle works on a new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Account that holds this line
    pub account_id: AccountId,

    /// Instrument held
    pub instrument_id: InstrumentId,

    /// Cash or tradable security
    pub kind: InstrumentKind,

    /// Held quantity in units (not lots)
    pub quantity: Quantity,

    /// Current unit price
    pub current_price: Money,
}

impl Position {
    pub fn new(
        account_id: AccountId,
        instrument_id: InstrumentId,
        kind: InstrumentKind,
        quantity: Quantity,
        current_price: Money,
    ) -> Self {
        Self {
            account_id,
            instrument_id,
            kind,
            quantity,
            current_price,
        }
    }

    /// Current unit price as an exact decimal
    pub fn price(&self) -> Price {
        self.current_price.to_decimal()
    }

    /// Position value: `price × quantity`, rounded half-even to nine fractional digits
    pub fn value(&self) -> Decimal {
        (self.price() * self.quantity)
            .round_dp_with_strategy(VALUE_SCALE, RoundingStrategy::MidpointNearestEven)
    }

    pub fn currency(&self) -> &str {
        &self.current_price.currency
    }

    pub fn is_currency(&self) -> bool {
        self.kind.is_currency()
    }

    /// Value rendered as `CUR - value`
    pub fn value_label(&self) -> String {
        format!("{} - {}", self.currency(), format_decimal(self.value()))
    }
}
