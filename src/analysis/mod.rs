//! Analysis modules.
//!
//! Aggregation over recorded entries: totals, winners, personal bests.

pub mod aggregator;

pub use aggregator::*;
