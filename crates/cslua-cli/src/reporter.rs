use colored::Colorize;
use rustc_hash::FxHashSet;

use cslua_common::{Diagnostic, DiagnosticCategory};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    #[must_use]
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    #[must_use]
    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    /// `Player.cs#12 - error CSL2001: message`
    #[must_use]
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let location = if diagnostic.file.is_empty() {
            format!("<unknown>{}", diagnostic.node)
        } else {
            format!("{}{}", diagnostic.file, diagnostic.node)
        };
        let location = if self.color {
            location.cyan().to_string()
        } else {
            location
        };
        format!(
            "{location} - {} {}: {}",
            self.format_category(diagnostic.category),
            self.format_code(diagnostic.code),
            diagnostic.message_text
        )
    }

    /// `Found 3 errors in 2 files.`
    #[must_use]
    pub fn summary(&self, diagnostics: &[Diagnostic]) -> String {
        let files: FxHashSet<&str> = diagnostics.iter().map(|d| d.file.as_str()).collect();
        let errors = diagnostics.len();
        let plural = |n: usize, word: &str| {
            if n == 1 {
                format!("{n} {word}")
            } else {
                format!("{n} {word}s")
            }
        };
        let text = format!(
            "Found {} in {}.",
            plural(errors, "error"),
            plural(files.len(), "file")
        );
        if self.color && errors > 0 {
            text.red().bold().to_string()
        } else {
            text
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Message => label.blue().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("CSL{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod tests;
