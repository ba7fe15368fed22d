use async_trait::async_trait;
use mirror_core::{AccountId, Position};

use crate::error::BrokerResult;

/// Port for portfolio snapshots
#[async_trait]
pub trait PortfolioSource: Send + Sync {
    /// Full list of positions (cash lines included) held by an account
    ///
    /// Order of the returned lines is the broker's order and is preserved
    /// by the engine for the whole cycle.
    async fn portfolio(&self, account_id: &AccountId) -> BrokerResult<Vec<Position>>;
}
