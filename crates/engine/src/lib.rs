//! Mirror Replication Engine
//!
//! Keeps a destination account holding the same instruments as a source
//! account, scaled to the destination's capital.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────────────────────────────┐
//! Portfolio  ───► │  Ratio Calculator                        │
//! source          │  - src/dst snapshots, totals, reserve    │
//!                 └──────────────────┬───────────────────────┘
//!                                    │ ratio, positions
//!                 ┌──────────────────▼───────────────────────┐
//! Instrument ───► │  Position Diff Engine                    │
//! directory       │  - targets = ratio × source quantity     │
//!                 │  - lot rounding, tradability filter      │
//!                 └──────────────────┬───────────────────────┘
//!                                    │ sell / buy intents
//!                 ┌──────────────────▼───────────────────────┐
//!                 │  Order Plan Guard                        │
//!                 │  - notional above threshold              │
//!                 │  - simulation mode                       │
//!                 └──────────────────┬───────────────────────┘
//!                                    │
//! Order gateway ◄──── sells, then buys
//!
//! Position feed ───► Trigger Filter ───► next cycle
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mirror_engine::{Replicator, SyncConfig};
//!
//! let config = SyncConfig::default().with_threshold(dec!(0.004))?;
//! let replicator = Replicator::new(broker, config);
//!
//! let report = replicator.sync(&src, &dst).await?;
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod guard;
pub mod ratio;
pub mod report;
pub mod sync;
pub mod trigger;

// Re-export main types
pub use config::{DEFAULT_RESERVE, DEFAULT_THRESHOLD, SyncConfig, fraction_from_f64};
pub use diff::{
    InstrumentBook, TargetMap, load_instruments, lots_for, plan_buys, plan_sells,
    target_positions,
};
pub use error::{ConfigError, ConfigResult, SyncError, SyncResult};
pub use guard::{GuardDecision, plan_notional, should_execute};
pub use ratio::{PositionMap, RatioSnapshot, compute_ratio, ratio_from_snapshots};
pub use report::{PortfolioReport, REPORT, Reporter, describe_position, resolve_instrument};
pub use sync::{Replicator, SyncPlan, SyncReport};
pub use trigger::is_actionable;
