//! Command-line driver for the cslua portability pre-pass.
//!
//! Loads a program document and a rule document, rewrites every compilation
//! unit in parallel, and writes the rewritten units, the diagnostics and the
//! accumulated rule misses.

pub mod args;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
