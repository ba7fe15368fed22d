use serde::{Deserialize, Serialize};

/// Exchange trading status of an instrument
///
/// Only `NormalTrading` allows the engine to act; every other status
/// (auctions, breaks, dealer-only sessions) is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingStatus {
    #[default]
    Unspecified,
    NotAvailableForTrading,
    OpeningPeriod,
    ClosingPeriod,
    BreakInTrading,
    NormalTrading,
    ClosingAuction,
    DarkPoolAuction,
    DiscreteAuction,
    OpeningAuctionPeriod,
    TradingAtClosingAuctionPrice,
    SessionAssigned,
    SessionClose,
    SessionOpen,
    DealerNormalTrading,
    DealerBreakInTrading,
    DealerNotAvailableForTrading,
}

impl TradingStatus {
    /// Whether the exchange currently accepts regular orders
    pub fn is_normal_trading(&self) -> bool {
        matches!(self, TradingStatus::NormalTrading)
    }
}
