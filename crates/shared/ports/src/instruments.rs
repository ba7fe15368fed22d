use async_trait::async_trait;
use mirror_core::{Instrument, InstrumentId, InstrumentSummary};

use crate::error::BrokerResult;

/// Port for the instrument directory
#[async_trait]
pub trait InstrumentDirectory: Send + Sync {
    /// Free-text search (uid, ticker, name). May return any number of matches.
    async fn find_instrument(&self, query: &str) -> BrokerResult<Vec<InstrumentSummary>>;

    /// Full record with lot size and current trading status
    async fn instrument_by_uid(&self, uid: &InstrumentId) -> BrokerResult<Instrument>;
}
