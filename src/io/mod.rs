//! Input/output helpers.
//!
//! - CSV reading + table validation (`ingest`)
//! - dataset/report exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
