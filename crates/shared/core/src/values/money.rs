use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::format_decimal;

/// Sub-unit resolution of [`Money`]: amounts are carried in units of 10^-9.
pub const NANOS_PER_UNIT: i64 = 1_000_000_000;

/// Monetary amount in broker wire form
///
/// Whole `units` plus a fractional `nano` component at 10^-9 resolution.
/// The magnitude of `nano` is always below 10^9.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// ISO currency code (e.g. `RUB`, `USD`)
    pub currency: String,
    /// Whole units
    pub units: i64,
    /// Fractional part in billionths
    pub nano: i32,
}

impl Money {
    /// Create a money amount, carrying any nano overflow into `units`
    pub fn new(currency: impl Into<String>, units: i64, nano: i64) -> Self {
        Self {
            currency: currency.into(),
            units: units + nano / NANOS_PER_UNIT,
            nano: (nano % NANOS_PER_UNIT) as i32,
        }
    }

    /// Zero amount in the given currency
    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(currency, 0, 0)
    }

    /// Convert an exact decimal into wire form.
    ///
    /// The value is rounded half-even to nine fractional digits first.
    /// Returns `None` when the whole part does not fit in `i64`.
    pub fn from_decimal(currency: impl Into<String>, value: Decimal) -> Option<Self> {
        let value = value.round_dp_with_strategy(9, RoundingStrategy::MidpointNearestEven);
        let whole = value.trunc();
        let nano = ((value - whole) * Decimal::from(NANOS_PER_UNIT)).to_i32()?;
        Some(Self {
            currency: currency.into(),
            units: whole.to_i64()?,
            nano,
        })
    }

    /// Exact decimal value of this amount
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.units) + Decimal::new(i64::from(self.nano), 9)
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0 && self.nano == 0
    }

    /// Human-readable form for blocked cash: `blocked RUB - 1.5`
    pub fn blocked_label(&self) -> String {
        format!("blocked {}", self)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.currency, format_decimal(self.to_decimal()))
    }
}
