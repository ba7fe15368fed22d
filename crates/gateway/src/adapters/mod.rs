//! Broker adapters
//!
//! Adapters implement the engine's ports against a concrete broker.
//! The paper adapter keeps everything in process for dry runs and tests.

pub mod paper;
