//! Per-monitor heartbeat history.
//!
//! Holds the bounded sample window for each monitor and the pure
//! derivations the dashboard renders from it.

mod aggregator;
mod models;
mod segments;
mod stats;
mod trend;

pub use aggregator::*;
pub use models::*;
pub use segments::*;
pub use stats::*;
pub use trend::*;
