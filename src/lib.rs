//! `demandwatch` library crate.
//!
//! The binary (`dw`) is a thin wrapper around this library so that:
//!
//! - the validate -> filter -> aggregate -> alert pipeline is testable
//!   without spawning processes
//! - modules are reusable (e.g., a future dashboard front-end)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod filter;
pub mod io;
pub mod metrics;
pub mod report;
