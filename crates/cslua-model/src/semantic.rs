//! Resolved-symbol query capability.
//!
//! The rewriter never resolves names itself. Everything it needs to know about
//! a node (its symbol, its static type) or about a parameter's declaration
//! site is answered through `SemanticModel`.

use cslua_common::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::symbol::{AssemblyId, SymbolArena, SymbolId};

/// An expression re-resolved against a declaration's own lexical scope.
///
/// Carries what later inlining needs: the fully qualified source text and
/// the expression's resolved type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedExpr {
    pub text: String,
    #[serde(default)]
    pub ty: Option<SymbolId>,
}

pub trait SemanticModel {
    /// Symbol arena shared by every unit of the program.
    fn symbols(&self) -> &SymbolArena;

    /// Assembly being transpiled; every other assembly is extern.
    fn program_assembly(&self) -> AssemblyId;

    /// Symbol a node resolves to (method for invocations, member for member
    /// accesses, type for type syntax, conversion operator for casts).
    fn symbol_info(&self, node: NodeIndex) -> Option<SymbolId>;

    /// Static type of an expression, or the declared type of a declarator.
    fn type_info(&self, node: NodeIndex) -> Option<SymbolId>;

    /// Source text of the default value of `method`'s parameter `parameter`,
    /// as written at its declaration site.
    fn default_value_text(&self, method: SymbolId, parameter: usize) -> Option<&str>;

    /// Re-resolve `text` inside the lexical scope of `method`'s declaration.
    ///
    /// `None` when the declaration site is not available (metadata-only
    /// assemblies, generated code).
    fn resolve_in_declaration_scope(&self, method: SymbolId, text: &str) -> Option<ResolvedExpr>;
}
