//! pseudobt-core
//!
//! Core library for reconstructing a plausible call history from a raw
//! region of embedded stack memory.
//!
//! This crate defines the scan data model, the per-word classification
//! logic, and the debugger backend adapter that feeds it. The scanner is
//! written against two small collaborator traits (memory read, symbol
//! resolution) so it is fully testable with fakes and reusable from
//! multiple frontends.

pub mod model;
pub mod services;

/// Library version string, for frontends that report it alongside results.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
