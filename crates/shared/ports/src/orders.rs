use async_trait::async_trait;
use mirror_core::{AccountId, OrderId, OrderIntent};

use crate::error::BrokerResult;

/// An order intent bound to the account it is placed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub account_id: AccountId,
    pub intent: OrderIntent,
}

impl OrderRequest {
    pub fn new(account_id: AccountId, intent: OrderIntent) -> Self {
        Self { account_id, intent }
    }
}

/// Port for order submission
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit an order and return the broker-assigned id
    async fn submit_order(&self, request: &OrderRequest) -> BrokerResult<OrderId>;
}
