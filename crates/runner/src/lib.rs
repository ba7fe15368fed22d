//! Mirror Runner
//!
//! Wires the replication engine to a broker and keeps it running:
//!
//! - **Args / Config**: command line flags over an optional JSON file
//! - **Bootstrap**: logging, paper broker, top-level flow
//! - **Reactor**: initial cycle, then one cycle per actionable feed event,
//!   resubscribing with backoff when the feed breaks
//!
//! ## Architecture
//!
//! ```text
//!   Args ──► RunnerConfig ──► SyncConfig
//!                  │
//!                  ▼
//!           ┌──────────────┐    position events    ┌────────────────┐
//!           │   Reactor    │ ◄──────────────────── │                │
//!           │ Idle/Syncing │                       │     Broker     │
//!           │              │ ──── Replicator ────► │ (paper broker) │
//!           └──────────────┘   snapshots, orders   └────────────────┘
//! ```

pub mod args;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod reactor;

// Re-export main types
pub use args::{Args, RunMode};
pub use config::{RestartSettings, RunnerConfig};
pub use error::{RunnerError, RunnerResult};
pub use reactor::{Reactor, ReactorState, ReactorStatus, RestartPolicy};
