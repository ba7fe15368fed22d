//! Transport for the position-change feed
//!
//! Uses tokio broadcast channels for single-process operation. A networked
//! broker adapter provides its own `PositionStream` implementation instead.

pub mod channel;
