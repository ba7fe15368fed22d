mod money;

pub use money::{Money, NANOS_PER_UNIT};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Unit price - uses Decimal for precision
pub type Price = Decimal;

/// Quantity of an instrument (units, not lots)
pub type Quantity = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Render a decimal in plain notation with trailing zeros stripped.
///
/// Whole numbers keep a single fractional zero, so `3` renders as `3.0`
/// and `-1.50` as `-1.5`.
pub fn format_decimal(value: Decimal) -> String {
    let plain = value.normalize().to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}
