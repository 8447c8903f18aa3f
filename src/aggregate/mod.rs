//! Province-to-region aggregation.
//!
//! The core single-pass transform: groups province geometries by region
//! and collects the diagnostics reported after each run.

pub mod merger;

pub use merger::*;
