//! Metric aggregation and threshold alerting.
//!
//! - per-source and per-(source, date) grouping (`aggregate`)
//! - fixed-threshold health evaluation (`alerts`)

pub mod aggregate;
pub mod alerts;

pub use aggregate::*;
pub use alerts::*;
