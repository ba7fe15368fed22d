//! Paper broker seed files
//!
//! ```json
//! {
//!   "instruments": [
//!     { "uid": "X", "name": "Example", "ticker": "EXM", "kind": "share",
//!       "lot": 10, "currency": "RUB", "price": "1.2" }
//!   ],
//!   "accounts": [
//!     { "id": "src", "name": "Source", "cash": { "RUB": "0" },
//!       "positions": [ { "instrument": "X", "quantity": "100" } ] }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use mirror_core::{InstrumentKind, TradingStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::Path;

use crate::error::SeedError;

fn default_kind() -> InstrumentKind {
    InstrumentKind::Share
}

fn default_status() -> TradingStatus {
    TradingStatus::NormalTrading
}

/// Instrument listed by the paper broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSeed {
    pub uid: String,
    pub name: String,
    pub ticker: String,
    #[serde(default = "default_kind")]
    pub kind: InstrumentKind,
    pub lot: NonZeroU32,
    #[serde(default = "default_status")]
    pub trading_status: TradingStatus,
    /// Quote currency
    pub currency: String,
    /// Current unit price
    pub price: Decimal,
}

/// Security holding of a seeded account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSeed {
    pub instrument: String,
    pub quantity: Decimal,
}

/// Account with its starting cash and holdings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSeed {
    pub id: String,
    pub name: String,
    /// Cash balance per currency code
    #[serde(default)]
    pub cash: IndexMap<String, Decimal>,
    #[serde(default)]
    pub positions: Vec<PositionSeed>,
}

/// Complete starting state of a paper broker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperSeed {
    #[serde(default)]
    pub instruments: Vec<InstrumentSeed>,
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
}

impl PaperSeed {
    /// Load a seed from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a seed from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let seed: PaperSeed = serde_json::from_str(json)?;
        Ok(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SEED: &str = r#"{
        "instruments": [
            { "uid": "X", "name": "Example", "ticker": "EXM", "lot": 10,
              "currency": "RUB", "price": "1.2" },
            { "uid": "F", "name": "Fund", "ticker": "FND", "kind": "etf", "lot": 1,
              "trading_status": "break_in_trading", "currency": "RUB", "price": 7 }
        ],
        "accounts": [
            { "id": "src", "name": "Source",
              "positions": [ { "instrument": "X", "quantity": "100" } ] },
            { "id": "dst", "name": "Destination", "cash": { "RUB": "240" } }
        ]
    }"#;

    #[test]
    fn test_parse_seed_with_defaults() {
        let seed = PaperSeed::from_json(SEED).unwrap();

        assert_eq!(seed.instruments.len(), 2);
        let x = &seed.instruments[0];
        assert_eq!(x.kind, InstrumentKind::Share);
        assert_eq!(x.trading_status, TradingStatus::NormalTrading);
        assert_eq!(x.price, dec!(1.2));
        assert_eq!(x.lot.get(), 10);

        let f = &seed.instruments[1];
        assert_eq!(f.kind, InstrumentKind::Etf);
        assert_eq!(f.trading_status, TradingStatus::BreakInTrading);

        assert!(seed.accounts[0].cash.is_empty());
        assert_eq!(seed.accounts[1].cash["RUB"], dec!(240));
    }

    #[test]
    fn test_zero_lot_is_rejected() {
        let json = r#"{ "instruments": [ { "uid": "X", "name": "n", "ticker": "t",
            "lot": 0, "currency": "RUB", "price": "1" } ] }"#;
        assert!(matches!(PaperSeed::from_json(json), Err(SeedError::Parse(_))));
    }
}
