//! Aggregation engine.
//!
//! `stats` holds the numeric kernels; `aggregator` applies them to
//! department groups and column pairs of a dataset.

pub mod aggregator;
pub mod stats;

pub use aggregator::*;
