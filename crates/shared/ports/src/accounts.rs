use async_trait::async_trait;
use mirror_core::Account;

use crate::error::BrokerResult;

/// Port for the account listing (used for reporting only)
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn accounts(&self) -> BrokerResult<Vec<Account>>;
}
