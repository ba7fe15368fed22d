use serde::{Deserialize, Serialize};

/// Kind of a portfolio line
///
/// Cash balances are `Currency`; every other kind is a tradable security
/// that the engine mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    Currency,
    Share,
    Etf,
    Bond,
    Future,
    Option,
    /// Any security type the broker reports that we have no dedicated tag for
    #[serde(other)]
    Other,
}

impl InstrumentKind {
    pub fn is_currency(&self) -> bool {
        matches!(self, InstrumentKind::Currency)
    }

    /// Everything that is not cash is tradable
    pub fn is_tradable(&self) -> bool {
        !self.is_currency()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Currency => "currency",
            InstrumentKind::Share => "share",
            InstrumentKind::Etf => "etf",
            InstrumentKind::Bond => "bond",
            InstrumentKind::Future => "future",
            InstrumentKind::Option => "option",
            InstrumentKind::Other => "other",
        }
    }
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
