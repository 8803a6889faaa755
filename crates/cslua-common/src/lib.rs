//! Common types and utilities for the cslua portability pre-pass.
//!
//! This crate provides foundational types used across all cslua crates:
//! - Node handles (`NodeIndex`) shared by the syntax tree and diagnostics
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, codes and message templates)

// Node handles into a syntax arena
pub mod node;
pub use node::NodeIndex;

// Diagnostic types and message lookup
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, format_message};
