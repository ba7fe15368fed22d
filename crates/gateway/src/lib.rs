//! Mirror Gateway
//!
//! Broker-side adapters for the mirroring engine. Provides:
//! - Transport for the position-change feed (tokio broadcast channels)
//! - A paper broker that implements every port in-process: portfolios,
//!   instrument directory, best-price fills and position notifications
//! - JSON seed loading for the paper broker
//!
//! ## Architecture
//!
//! ```text
//!   Engine / Reactor
//!         │  ports (PortfolioSource, InstrumentDirectory,
//!         │         OrderGateway, PositionStream, AccountDirectory)
//!    ┌────▼────────┐
//!    │ PaperBroker │──── fills ───► EventBus ──► PositionSubscription
//!    └─────────────┘
//! ```
//!
//! A live broker adapter plugs in by implementing the same port traits.

pub mod adapters;
pub mod error;
pub mod transport;

// Re-export commonly used types
pub use adapters::paper::{AccountSeed, InstrumentSeed, PaperBroker, PaperSeed, PositionSeed};
pub use error::SeedError;
pub use transport::channel::{ChannelSubscription, EventBus};
