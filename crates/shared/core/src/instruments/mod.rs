//! Instrument definitions
//!
//! - `InstrumentId`: stable broker identifier used as map key
//! - `InstrumentKind`: closed classification (cash vs. tradable securities)
//! - `Instrument` / `InstrumentSummary`: directory records with lot size and status

mod instrument;
mod kind;
mod status;

pub use instrument::{Instrument, InstrumentId, InstrumentSummary};
pub use kind::InstrumentKind;
pub use status::TradingStatus;
