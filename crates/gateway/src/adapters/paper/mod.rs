//! Paper broker
//!
//! In-memory broker that fills best-price orders immediately at the
//! instrument's current price and publishes a position-change event for
//! the account after every fill.

mod broker;
mod seed;

pub use broker::PaperBroker;
pub use seed::{AccountSeed, InstrumentSeed, PaperSeed, PositionSeed};
