//! Data providers (currently only the synthetic sample generator).

pub mod sample;

pub use sample::*;
