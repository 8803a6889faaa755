//! Diagnostic types and message lookup for the portability pre-pass.
//!
//! Message templates live in `data.rs`. Every rewriter diagnostic carries one
//! of the codes in `diagnostic_codes`; templates use `{0}`, `{1}`, ...
//! placeholders filled by `format_message`.

use serde::{Deserialize, Serialize};

use crate::NodeIndex;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Message = 3,
}

/// A portability diagnostic attached to a node of a compilation unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub node: NodeIndex,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, node: NodeIndex, message: String, code: u32) -> Self {
        Self {
            file,
            node,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
        }
    }

    /// Error diagnostic built from a registered code and template arguments.
    ///
    /// Unknown codes fall back to the bare arguments joined by spaces.
    #[must_use]
    pub fn from_code(file: &str, node: NodeIndex, code: u32, args: &[&str]) -> Self {
        let message = match get_message_template(code) {
            Some(template) => format_message(template, args),
            None => args.join(" "),
        };
        Self::error(file.to_string(), node, message, code)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.category, DiagnosticCategory::Error)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let category = match self.category {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Message => "message",
        };
        write!(
            f,
            "{}({}): {} CSL{}: {}",
            self.file, self.node, category, self.code, self.message_text
        )
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

#[cfg(test)]
#[path = "../../tests/diagnostics_tests.rs"]
mod tests;
