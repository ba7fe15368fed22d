//! Mirror Core Domain
//!
//! Pure domain types for the account mirroring engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod instruments;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Accounts
    Account,
    AccountId,
    // Orders
    Direction,
    ExecutionStyle,
    // Position change feed
    MoneyLine,
    OrderId,
    OrderIntent,
    // Portfolio snapshot
    Position,
    PositionEvent,
    PositionsUpdate,
    SecurityLine,
};
pub use instruments::{Instrument, InstrumentId, InstrumentKind, InstrumentSummary, TradingStatus};
pub use values::{Money, NANOS_PER_UNIT, Price, Quantity, Timestamp, format_decimal};
