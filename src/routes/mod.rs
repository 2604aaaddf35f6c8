//! Per-route grouping of parsed flights.
//!
//! This module collects parsed flights into per-route metric columns,
//! normalizes numeric values for compact output, and exposes the
//! origin→destination connection graph derived from the routes seen.

pub mod aggregate;
pub mod normalize;
pub mod types;

pub use aggregate::{RouteAggregator, RouteColumns};
pub use normalize::{normalize, round_to};
pub use types::{ColumnKey, Metric, Number, RouteKey};
