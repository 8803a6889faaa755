//! Resolved program model for the cslua portability pre-pass.
//!
//! The front end (parser + resolver) is an external collaborator. This crate
//! defines the shape of what it hands over:
//! - `symbol` - the resolved symbol arena (types, members, namespaces, assemblies)
//! - `syntax` - the syntax tree arena the rewriter walks and mutates
//! - `semantic` - the `SemanticModel` query capability over both
//! - `program` - the serialized program document and its bound model

pub mod program;
pub mod semantic;
pub mod symbol;
pub mod syntax;

pub use cslua_common::NodeIndex;
pub use program::{
    BoundModel, BoundUnit, DefaultValueSource, NodeBinding, ProgramDocument, ProgramError,
    ProgramIndex, UnitBindings, UnitDocument,
};
pub use semantic::{ResolvedExpr, SemanticModel};
pub use symbol::{
    AssemblyId, ConstantValue, MemberSymbol, MethodKind, MethodSymbol, NamespaceData,
    NamespaceId, OtherSymbol, Parameter, RefKind, SpecialType, Symbol, SymbolArena, SymbolId,
    TypeKind, TypeSymbol,
};
pub use syntax::{Node, NodeArena, NodeData};
