//! One run: load both documents, rewrite every unit in parallel, write the
//! requested outputs.

use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use cslua_common::{Diagnostic, NodeIndex};
use cslua_model::{NodeArena, ProgramDocument};
use cslua_rewriter::{KnownNamespaces, rewrite_unit};
use cslua_rules::{MissLog, MissReport, RuleDocument, RulePolicy, RuleTable};

use crate::args::CliArgs;

/// A rewritten compilation unit, as written to `--out`.
#[derive(Clone, Debug, Serialize)]
pub struct RewrittenUnit {
    pub file: String,
    pub root: NodeIndex,
    pub arena: NodeArena,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Debug, Default)]
pub struct RunOutput {
    /// In program-document order.
    pub units: Vec<RewrittenUnit>,
    pub misses: MissReport,
}

impl RunOutput {
    /// Every diagnostic, unit by unit.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.units
            .iter()
            .flat_map(|unit| unit.diagnostics.iter().cloned())
            .collect()
    }

    #[must_use]
    pub fn diagnostic_count(&self) -> usize {
        self.units.iter().map(|unit| unit.diagnostics.len()).sum()
    }
}

/// Rule policy from `--rules`, else `--config-dir`, else empty.
pub fn load_policy(args: &CliArgs) -> Result<RulePolicy> {
    let document = match (&args.rules, &args.config_dir) {
        (Some(path), _) => RuleDocument::load(path)
            .with_context(|| format!("failed to load rules from '{}'", path.display()))?,
        (None, Some(dir)) => RuleDocument::load_from_dir(dir)
            .with_context(|| format!("failed to load rules from '{}'", dir.display()))?,
        (None, None) => {
            warn!("no rule document given; every extern generic lookup will miss");
            RuleDocument::default()
        }
    };
    Ok(RulePolicy::from_document(&document))
}

/// Rewrite every unit of `document`, sharing one policy and one miss log.
#[must_use]
pub fn rewrite_program(
    document: ProgramDocument,
    policy: &RulePolicy,
    root_namespace: &str,
) -> RunOutput {
    let (program, units) = document.into_parts();
    let misses = MissLog::new();
    let rules = RuleTable::new(policy, &misses);
    let namespaces = KnownNamespaces::collect(program.symbols(), root_namespace);

    let units: Vec<RewrittenUnit> = units
        .into_par_iter()
        .map(|mut unit| {
            let output = rewrite_unit(&mut unit, &program, rules, &namespaces);
            RewrittenUnit {
                file: unit.file,
                root: unit.root,
                arena: unit.arena,
                diagnostics: output.diagnostics,
            }
        })
        .collect();

    let output = RunOutput {
        units,
        misses: misses.report(),
    };
    info!(
        units = output.units.len(),
        diagnostics = output.diagnostic_count(),
        misses = output.misses.total(),
        root_namespace,
        "rewrite finished"
    );
    output
}

/// Load, rewrite and write `--out` / `--report` if requested.
pub fn run(args: &CliArgs) -> Result<RunOutput> {
    let document = ProgramDocument::load(&args.program)
        .with_context(|| format!("failed to load program '{}'", args.program.display()))?;
    let policy = load_policy(args)?;
    let output = rewrite_program(document, &policy, &args.root_namespace);

    if let Some(path) = &args.out {
        write_json(path, &output.units, args.pretty)?;
    }
    if let Some(path) = &args.report {
        write_json(path, &output.misses.to_rule_document(), args.pretty)?;
    }
    Ok(output)
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    let text = text.context("failed to serialize output")?;
    std::fs::write(path, text).with_context(|| format!("failed to write '{}'", path.display()))
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
