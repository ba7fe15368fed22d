use async_trait::async_trait;
use mirror_core::{AccountId, PositionEvent};

use crate::error::BrokerResult;

/// An open position-change subscription
///
/// Yields events in arrival order. Once `next` returns an error the
/// subscription is considered dead and must be re-opened through
/// [`PositionStream::subscribe`].
#[async_trait]
pub trait PositionSubscription: Send {
    /// Wait for the next event
    async fn next(&mut self) -> BrokerResult<PositionEvent>;
}

/// Port for the restartable position-change feed
#[async_trait]
pub trait PositionStream: Send + Sync {
    /// Open a subscription for the given accounts
    async fn subscribe(
        &self,
        accounts: &[AccountId],
    ) -> BrokerResult<Box<dyn PositionSubscription>>;
}
