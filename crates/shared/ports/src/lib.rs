//! Mirror Ports
//!
//! Port definitions (traits) for the account mirroring engine.
//! These define the boundary between the replication logic and the broker:
//! portfolio snapshots, instrument directory, order submission, the
//! position-change feed and the account listing.

mod accounts;
mod error;
mod instruments;
mod orders;
mod portfolio;
mod stream;

pub use accounts::AccountDirectory;
pub use error::{BrokerError, BrokerResult};
pub use instruments::InstrumentDirectory;
pub use orders::{OrderGateway, OrderRequest};
pub use portfolio::PortfolioSource;
pub use stream::{PositionStream, PositionSubscription};

/// Everything the engine needs from a broker, in one bound
pub trait Broker:
    PortfolioSource + InstrumentDirectory + OrderGateway + PositionStream + AccountDirectory
{
}

impl<T> Broker for T where
    T: PortfolioSource + InstrumentDirectory + OrderGateway + PositionStream + AccountDirectory
{
}
