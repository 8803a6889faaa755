//! Serialized program document and its bound semantic model.
//!
//! A `ProgramDocument` is what the front end writes out after parsing and
//! resolving a program: the shared symbol arena, per-parameter default-value
//! sources, and every compilation unit with its node bindings. Loading it
//! splits it into a shared `ProgramIndex` and one `BoundUnit` per file, so
//! units can be rewritten independently (and in parallel) while sharing the
//! program-level data by reference.

use std::path::{Path, PathBuf};

use cslua_common::NodeIndex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::semantic::{ResolvedExpr, SemanticModel};
use crate::symbol::{AssemblyId, NamespaceId, SymbolArena, SymbolId};
use crate::syntax::NodeArena;

// =============================================================================
// Document
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramDocument {
    /// Assembly being transpiled.
    pub assembly: AssemblyId,
    pub symbols: SymbolArena,
    #[serde(default)]
    pub default_values: Vec<DefaultValueSource>,
    #[serde(default)]
    pub units: Vec<UnitDocument>,
}

/// Declaration-site default value of one parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultValueSource {
    pub method: SymbolId,
    pub parameter: usize,
    /// Source text at the declaration site.
    pub text: String,
    /// The text resolved in the declaration's scope, when the front end could
    /// resolve it.
    #[serde(default)]
    pub resolved: Option<ResolvedExpr>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitDocument {
    pub file: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    #[serde(default)]
    pub bindings: Vec<NodeBinding>,
}

/// Resolution results the front end recorded for one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeBinding {
    pub node: NodeIndex,
    #[serde(default)]
    pub symbol: Option<SymbolId>,
    #[serde(default)]
    pub ty: Option<SymbolId>,
}

#[derive(Debug)]
pub enum ProgramError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    DanglingNode { file: String, node: NodeIndex },
    DanglingSymbol { file: String, symbol: SymbolId },
    CyclicSymbol { symbol: SymbolId },
    CyclicNamespace { namespace: NamespaceId },
}

impl std::fmt::Display for ProgramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read program '{}': {source}", path.display())
            }
            Self::Json(err) => write!(f, "malformed program document: {err}"),
            Self::DanglingNode { file, node } => {
                write!(f, "{file}: reference to missing node {node}")
            }
            Self::DanglingSymbol { file, symbol } => {
                write!(f, "{file}: reference to missing symbol {}", symbol.0)
            }
            Self::CyclicSymbol { symbol } => {
                write!(f, "<symbols>: symbol {} is part of a reference cycle", symbol.0)
            }
            Self::CyclicNamespace { namespace } => {
                write!(f, "<symbols>: namespace {} is its own ancestor", namespace.0)
            }
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::DanglingNode { .. }
            | Self::DanglingSymbol { .. }
            | Self::CyclicSymbol { .. }
            | Self::CyclicNamespace { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ProgramError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl ProgramDocument {
    pub fn load(path: &Path) -> Result<Self, ProgramError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProgramError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            units = document.units.len(),
            symbols = document.symbols.len(),
            "loaded program document"
        );
        Ok(document)
    }

    /// Parse and validate a document.
    pub fn from_json_str(text: &str) -> Result<Self, ProgramError> {
        let document: Self = serde_json::from_str(text)?;
        document.validate()?;
        Ok(document)
    }

    /// Reject documents whose handles point outside their arenas, or whose
    /// symbol graph loops.
    pub fn validate(&self) -> Result<(), ProgramError> {
        if let Some(symbol) = self.symbols.first_dangling_reference() {
            return Err(ProgramError::DanglingSymbol {
                file: "<symbols>".to_string(),
                symbol,
            });
        }
        if let Some(symbol) = self.symbols.first_cyclic_reference() {
            return Err(ProgramError::CyclicSymbol { symbol });
        }
        if let Some(namespace) = self.symbols.first_cyclic_namespace() {
            return Err(ProgramError::CyclicNamespace { namespace });
        }
        let symbol_exists = |id: SymbolId| self.symbols.get(id).is_some();
        for source in &self.default_values {
            if !symbol_exists(source.method) {
                return Err(ProgramError::DanglingSymbol {
                    file: "<default values>".to_string(),
                    symbol: source.method,
                });
            }
        }
        for unit in &self.units {
            if !unit.arena.contains(unit.root) {
                return Err(ProgramError::DanglingNode {
                    file: unit.file.clone(),
                    node: unit.root,
                });
            }
            for binding in &unit.bindings {
                if !unit.arena.contains(binding.node) {
                    return Err(ProgramError::DanglingNode {
                        file: unit.file.clone(),
                        node: binding.node,
                    });
                }
                if let Some(symbol) = binding
                    .symbol
                    .into_iter()
                    .chain(binding.ty)
                    .find(|&s| !symbol_exists(s))
                {
                    return Err(ProgramError::DanglingSymbol {
                        file: unit.file.clone(),
                        symbol,
                    });
                }
            }
        }
        Ok(())
    }

    /// Split into the shared program index and the per-file units.
    #[must_use]
    pub fn into_parts(self) -> (ProgramIndex, Vec<BoundUnit>) {
        let mut index = ProgramIndex::new(self.assembly, self.symbols);
        for source in self.default_values {
            index.add_default_value(source);
        }
        let units = self
            .units
            .into_iter()
            .map(|unit| BoundUnit {
                bindings: UnitBindings::from_bindings(&unit.bindings),
                file: unit.file,
                arena: unit.arena,
                root: unit.root,
            })
            .collect();
        (index, units)
    }
}

// =============================================================================
// Bound model
// =============================================================================

/// Program-level data shared by every unit.
#[derive(Clone, Debug)]
pub struct ProgramIndex {
    assembly: AssemblyId,
    symbols: SymbolArena,
    default_values: FxHashMap<(SymbolId, usize), DefaultValueSource>,
}

impl ProgramIndex {
    #[must_use]
    pub fn new(assembly: AssemblyId, symbols: SymbolArena) -> Self {
        Self {
            assembly,
            symbols,
            default_values: FxHashMap::default(),
        }
    }

    pub fn add_default_value(&mut self, source: DefaultValueSource) {
        self.default_values
            .insert((source.method, source.parameter), source);
    }

    #[must_use]
    pub const fn assembly(&self) -> AssemblyId {
        self.assembly
    }

    #[must_use]
    pub const fn symbols(&self) -> &SymbolArena {
        &self.symbols
    }
}

/// Node → symbol / node → type maps of one unit.
#[derive(Clone, Debug, Default)]
pub struct UnitBindings {
    symbols: FxHashMap<NodeIndex, SymbolId>,
    types: FxHashMap<NodeIndex, SymbolId>,
}

impl UnitBindings {
    #[must_use]
    pub fn from_bindings(bindings: &[NodeBinding]) -> Self {
        let mut out = Self::default();
        for binding in bindings {
            if let Some(symbol) = binding.symbol {
                out.symbols.insert(binding.node, symbol);
            }
            if let Some(ty) = binding.ty {
                out.types.insert(binding.node, ty);
            }
        }
        out
    }

    pub fn bind_symbol(&mut self, node: NodeIndex, symbol: SymbolId) -> &mut Self {
        self.symbols.insert(node, symbol);
        self
    }

    pub fn bind_type(&mut self, node: NodeIndex, ty: SymbolId) -> &mut Self {
        self.types.insert(node, ty);
        self
    }
}

/// One compilation unit ready for rewriting.
#[derive(Clone, Debug)]
pub struct BoundUnit {
    pub file: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub bindings: UnitBindings,
}

/// `SemanticModel` over a `ProgramIndex` and one unit's bindings.
#[derive(Clone, Copy, Debug)]
pub struct BoundModel<'a> {
    program: &'a ProgramIndex,
    bindings: &'a UnitBindings,
}

impl<'a> BoundModel<'a> {
    #[must_use]
    pub const fn new(program: &'a ProgramIndex, bindings: &'a UnitBindings) -> Self {
        Self { program, bindings }
    }
}

impl SemanticModel for BoundModel<'_> {
    fn symbols(&self) -> &SymbolArena {
        &self.program.symbols
    }

    fn program_assembly(&self) -> AssemblyId {
        self.program.assembly
    }

    fn symbol_info(&self, node: NodeIndex) -> Option<SymbolId> {
        self.bindings.symbols.get(&node).copied()
    }

    fn type_info(&self, node: NodeIndex) -> Option<SymbolId> {
        self.bindings.types.get(&node).copied()
    }

    fn default_value_text(&self, method: SymbolId, parameter: usize) -> Option<&str> {
        self.program
            .default_values
            .get(&(method, parameter))
            .map(|source| source.text.as_str())
    }

    fn resolve_in_declaration_scope(&self, method: SymbolId, text: &str) -> Option<ResolvedExpr> {
        self.program
            .default_values
            .iter()
            .filter(|((m, _), _)| *m == method)
            .find(|(_, source)| source.text == text)
            .and_then(|(_, source)| source.resolved.clone())
    }
}

#[cfg(test)]
#[path = "../tests/program_tests.rs"]
mod tests;
