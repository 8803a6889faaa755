//! Where diagnostics go besides the rewriter's own output list.

use cslua_common::NodeIndex;
use tracing::warn;

pub trait DiagnosticSink {
    fn log(&self, node: NodeIndex, message: &str);
}

/// Forwards every diagnostic to `tracing` at `warn` level.
#[derive(Copy, Clone, Debug)]
pub struct TracingSink<'a> {
    file: &'a str,
}

impl<'a> TracingSink<'a> {
    #[must_use]
    pub const fn new(file: &'a str) -> Self {
        Self { file }
    }
}

impl DiagnosticSink for TracingSink<'_> {
    fn log(&self, node: NodeIndex, message: &str) {
        warn!(file = self.file, %node, "{message}");
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn log(&self, _node: NodeIndex, _message: &str) {}
}
