use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cslua_cli::args::{CliArgs, OutputFormat};
use cslua_cli::reporter::Reporter;
use cslua_cli::{driver, tracing_config};

const EXIT_SUCCESS: u8 = 0;
const EXIT_DIAGNOSTICS: u8 = 1;

fn main() -> Result<ExitCode> {
    // Initialize tracing if CSLUA_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let output = driver::run(&args)?;
    let diagnostics = output.diagnostics();

    match args.format {
        OutputFormat::Json => {
            let text = if args.pretty {
                serde_json::to_string_pretty(&diagnostics)
            } else {
                serde_json::to_string(&diagnostics)
            };
            println!("{}", text.context("failed to serialize diagnostics")?);
        }
        OutputFormat::Text => {
            if !diagnostics.is_empty() {
                let color = !args.no_color && std::io::stdout().is_terminal();
                let reporter = Reporter::new(color);
                println!("{}", reporter.render(&diagnostics));
                println!();
                println!("{}", reporter.summary(&diagnostics));
            }
        }
    }

    Ok(ExitCode::from(if diagnostics.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_DIAGNOSTICS
    }))
}
