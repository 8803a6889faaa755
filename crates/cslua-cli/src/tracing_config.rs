//! Diagnostic logging for the `cslua` binary.
//!
//! Off unless `CSLUA_LOG` or `RUST_LOG` holds a filter directive.
//! `CSLUA_LOG_FORMAT` picks the layer: `text` (default), `tree` for
//! span-indented output from `tracing-tree`, or `json`. Everything goes to
//! stderr so `--format json` output on stdout stays clean.
//!
//! ```bash
//! # Which rule lookups missed, per unit
//! CSLUA_LOG=cslua_rules=trace CSLUA_LOG_FORMAT=tree cslua -p program.json
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const FILTER_VAR: &str = "CSLUA_LOG";
const FALLBACK_FILTER_VAR: &str = "RUST_LOG";
const FORMAT_VAR: &str = "CSLUA_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Unknown values fall back to `Text`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Filter directive and layer choice, resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub directive: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings through `var`; `None` when no filter variable is set.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let directive = var(FILTER_VAR).or_else(|| var(FALLBACK_FILTER_VAR))?;
        let format = var(FORMAT_VAR).map_or(LogFormat::Text, |v| LogFormat::parse(&v));
        Some(Self { directive, format })
    }

    /// Install the global subscriber.
    pub fn install(&self) {
        let filter = EnvFilter::builder().parse_lossy(&self.directive);
        let registry = Registry::default().with(filter);
        match self.format {
            LogFormat::Tree => registry
                .with(
                    tracing_tree::HierarchicalLayer::default()
                        .with_indent_amount(2)
                        .with_indent_lines(true)
                        .with_deferred_spans(true)
                        .with_targets(true),
                )
                .init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init(),
            LogFormat::Text => registry
                .with(fmt::layer().with_writer(std::io::stderr))
                .init(),
        }
    }
}

pub fn init_tracing() {
    if let Some(settings) = LogSettings::from_vars(|name| std::env::var(name).ok()) {
        settings.install();
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
