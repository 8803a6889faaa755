use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the cslua binary.
#[derive(Parser, Debug)]
#[command(
    name = "cslua",
    version,
    about = "Portability check and namespace flattening for C#-to-Lua translation"
)]
pub struct CliArgs {
    /// Program document written by the front end (JSON).
    #[arg(short = 'p', long)]
    pub program: PathBuf,

    /// Directory containing `rewriter.json`.
    #[arg(short = 'c', long = "config-dir", alias = "configDir")]
    pub config_dir: Option<PathBuf>,

    /// Path of the rule document; takes precedence over `--config-dir`.
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Namespace whose declarations are flattened into each unit.
    #[arg(short = 'r', long = "root-namespace", alias = "rootNamespace", default_value = "")]
    pub root_namespace: String,

    /// Write the rewritten units here (JSON).
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Write the rule misses here, as a rule document ready to merge.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// How diagnostics are printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Never color diagnostics.
    #[arg(long = "no-color", alias = "noColor")]
    pub no_color: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per diagnostic.
    Text,
    /// A JSON array of diagnostics.
    Json,
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod tests;
