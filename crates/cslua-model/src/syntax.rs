//! Syntax tree arena.
//!
//! The tree mirrors the subset of C# syntax the pre-pass reasons about. Node
//! kinds it never inspects collapse into `NodeData::Opaque`, which keeps its
//! source text and children so the rewriter still visits nested expressions.
//!
//! Nodes are never freed. Rewrites allocate replacement nodes and re-link the
//! parent, so handles of original nodes stay valid for `SemanticModel`
//! queries for the whole pass.

use cslua_common::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::symbol::RefKind;

/// A tree node: its kind-specific data plus leading comment trivia.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub data: NodeData,
    /// Comments emitted before the node, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

impl Node {
    #[must_use]
    pub const fn new(data: NodeData) -> Self {
        Self {
            data,
            leading_comments: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeData {
    // =========================================================================
    // Compilation unit & declarations
    // =========================================================================
    CompilationUnit {
        #[serde(default)]
        externs: Vec<NodeIndex>,
        #[serde(default)]
        usings: Vec<NodeIndex>,
        #[serde(default)]
        attribute_lists: Vec<NodeIndex>,
        #[serde(default)]
        members: Vec<NodeIndex>,
    },
    /// `extern alias Name;`
    ExternAlias { name: String },
    /// `using Name;` / `using Alias = Name;`
    UsingDirective {
        #[serde(default)]
        alias: Option<String>,
        name: NodeIndex,
    },
    NamespaceDeclaration {
        name: NodeIndex,
        #[serde(default)]
        externs: Vec<NodeIndex>,
        #[serde(default)]
        usings: Vec<NodeIndex>,
        #[serde(default)]
        members: Vec<NodeIndex>,
    },
    /// Class, struct, interface, enum or delegate declaration.
    TypeDeclaration {
        keyword: String,
        name: String,
        #[serde(default)]
        members: Vec<NodeIndex>,
    },
    MethodDeclaration {
        name: String,
        #[serde(default)]
        body: Vec<NodeIndex>,
    },
    /// Local function statement; no lowering exists for it.
    LocalFunction {
        name: String,
        #[serde(default)]
        body: Vec<NodeIndex>,
    },

    // =========================================================================
    // Statements
    // =========================================================================
    Block {
        #[serde(default)]
        statements: Vec<NodeIndex>,
    },
    /// Local or field declaration with its declarators.
    VariableDeclaration {
        ty: NodeIndex,
        #[serde(default)]
        declarators: Vec<NodeIndex>,
    },
    VariableDeclarator {
        name: String,
        #[serde(default = "none_index")]
        initializer: NodeIndex,
    },
    ExpressionStatement { expression: NodeIndex },
    Return {
        #[serde(default = "none_index")]
        expression: NodeIndex,
    },
    Switch {
        expression: NodeIndex,
        #[serde(default)]
        sections: Vec<NodeIndex>,
    },
    SwitchSection {
        #[serde(default)]
        labels: Vec<NodeIndex>,
        #[serde(default)]
        statements: Vec<NodeIndex>,
    },
    CaseLabel { value: NodeIndex },
    /// `case Type name when cond:`; no lowering exists for it.
    CasePatternLabel { pattern: NodeIndex },

    // =========================================================================
    // Names
    // =========================================================================
    IdentifierName { text: String },
    GenericName {
        text: String,
        #[serde(default)]
        type_arguments: Vec<NodeIndex>,
    },
    QualifiedName { left: NodeIndex, right: NodeIndex },
    PredefinedType { keyword: String },

    // =========================================================================
    // Expressions
    // =========================================================================
    Literal { text: String },
    MemberAccess { expression: NodeIndex, name: NodeIndex },
    Invocation {
        expression: NodeIndex,
        #[serde(default)]
        arguments: Vec<NodeIndex>,
    },
    Argument {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        ref_kind: RefKind,
        expression: NodeIndex,
    },
    ObjectCreation {
        ty: NodeIndex,
        #[serde(default)]
        arguments: Vec<NodeIndex>,
    },
    TypeOf { ty: NodeIndex },
    Assignment { left: NodeIndex, right: NodeIndex },
    Cast { ty: NodeIndex, expression: NodeIndex },
    /// `expr is Type name`; no lowering exists for it.
    IsPattern { expression: NodeIndex, pattern: NodeIndex },

    // =========================================================================
    // Query expressions
    // =========================================================================
    QueryExpression {
        #[serde(default)]
        clauses: Vec<NodeIndex>,
    },
    /// `from`, `where`, `select`, `orderby`, `let`.
    QueryClause {
        keyword: String,
        #[serde(default)]
        expressions: Vec<NodeIndex>,
    },
    JoinClause {
        identifier: String,
        #[serde(default)]
        expressions: Vec<NodeIndex>,
        #[serde(default = "none_index")]
        into: NodeIndex,
    },
    JoinIntoClause { identifier: String },
    GroupClause { group: NodeIndex, by: NodeIndex },
    QueryContinuation {
        identifier: String,
        #[serde(default)]
        clauses: Vec<NodeIndex>,
    },

    /// Anything else; printed verbatim, children still visited.
    Opaque {
        text: String,
        #[serde(default)]
        children: Vec<NodeIndex>,
    },
}

const fn none_index() -> NodeIndex {
    NodeIndex::NONE
}

impl NodeData {
    /// Visit every child handle in source order, allowing replacement.
    ///
    /// `NodeIndex::NONE` slots are skipped.
    pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut NodeIndex)) {
        let mut one = |idx: &mut NodeIndex| {
            if idx.is_some() {
                f(idx);
            }
        };
        match self {
            Self::CompilationUnit {
                externs,
                usings,
                attribute_lists,
                members,
            } => {
                externs
                    .iter_mut()
                    .chain(usings.iter_mut())
                    .chain(attribute_lists.iter_mut())
                    .chain(members.iter_mut())
                    .for_each(&mut one);
            }
            Self::NamespaceDeclaration {
                name,
                externs,
                usings,
                members,
            } => {
                one(name);
                externs
                    .iter_mut()
                    .chain(usings.iter_mut())
                    .chain(members.iter_mut())
                    .for_each(&mut one);
            }
            Self::UsingDirective { name, .. } => one(name),
            Self::TypeDeclaration { members, .. } => members.iter_mut().for_each(&mut one),
            Self::MethodDeclaration { body, .. } | Self::LocalFunction { body, .. } => {
                body.iter_mut().for_each(&mut one);
            }
            Self::Block { statements } => statements.iter_mut().for_each(&mut one),
            Self::VariableDeclaration { ty, declarators } => {
                one(ty);
                declarators.iter_mut().for_each(&mut one);
            }
            Self::VariableDeclarator { initializer, .. } => one(initializer),
            Self::ExpressionStatement { expression } | Self::Return { expression } => {
                one(expression);
            }
            Self::Switch {
                expression,
                sections,
            } => {
                one(expression);
                sections.iter_mut().for_each(&mut one);
            }
            Self::SwitchSection { labels, statements } => {
                labels
                    .iter_mut()
                    .chain(statements.iter_mut())
                    .for_each(&mut one);
            }
            Self::CaseLabel { value } => one(value),
            Self::CasePatternLabel { pattern } => one(pattern),
            Self::GenericName { type_arguments, .. } => {
                type_arguments.iter_mut().for_each(&mut one);
            }
            Self::QualifiedName { left, right } => {
                one(left);
                one(right);
            }
            Self::MemberAccess { expression, name } => {
                one(expression);
                one(name);
            }
            Self::Invocation {
                expression,
                arguments,
            } => {
                one(expression);
                arguments.iter_mut().for_each(&mut one);
            }
            Self::Argument { expression, .. } => one(expression),
            Self::ObjectCreation { ty, arguments } => {
                one(ty);
                arguments.iter_mut().for_each(&mut one);
            }
            Self::TypeOf { ty } => one(ty),
            Self::Assignment { left, right } => {
                one(left);
                one(right);
            }
            Self::Cast { ty, expression } => {
                one(ty);
                one(expression);
            }
            Self::IsPattern {
                expression,
                pattern,
            } => {
                one(expression);
                one(pattern);
            }
            Self::QueryExpression { clauses } | Self::QueryContinuation { clauses, .. } => {
                clauses.iter_mut().for_each(&mut one);
            }
            Self::QueryClause { expressions, .. } => expressions.iter_mut().for_each(&mut one),
            Self::JoinClause {
                expressions, into, ..
            } => {
                expressions.iter_mut().for_each(&mut one);
                one(into);
            }
            Self::GroupClause { group, by } => {
                one(group);
                one(by);
            }
            Self::Opaque { children, .. } => children.iter_mut().for_each(&mut one),
            Self::ExternAlias { .. }
            | Self::IdentifierName { .. }
            | Self::PredefinedType { .. }
            | Self::Literal { .. }
            | Self::JoinIntoClause { .. } => {}
        }
    }

    /// Child handles in source order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut copy = self.clone();
        let mut out = Vec::new();
        copy.for_each_child_mut(|idx| out.push(*idx));
        out
    }

    #[must_use]
    pub const fn is_namespace(&self) -> bool {
        matches!(self, Self::NamespaceDeclaration { .. })
    }

    /// Names that can stand on the right of a qualified name.
    #[must_use]
    pub const fn is_simple_name(&self) -> bool {
        matches!(self, Self::IdentifierName { .. } | Self::GenericName { .. })
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Owner of every node of one compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, data: NodeData) -> NodeIndex {
        self.nodes.push(Node::new(data));
        NodeIndex((self.nodes.len() - 1) as u32)
    }

    #[must_use]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx.index())
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(idx.index())
    }

    #[must_use]
    pub fn data(&self, idx: NodeIndex) -> Option<&NodeData> {
        self.get(idx).map(|n| &n.data)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, idx: NodeIndex) -> bool {
        idx.index() < self.nodes.len()
    }

    /// Prepend a comment to the node's leading trivia.
    pub fn prepend_comment(&mut self, idx: NodeIndex, comment: String) {
        if let Some(node) = self.get_mut(idx) {
            node.leading_comments.insert(0, comment);
        }
    }

    /// Copy leading trivia from `from` onto `to`.
    pub fn copy_trivia(&mut self, from: NodeIndex, to: NodeIndex) {
        let comments = self
            .get(from)
            .map(|n| n.leading_comments.clone())
            .unwrap_or_default();
        if let Some(node) = self.get_mut(to) {
            node.leading_comments = comments;
        }
    }

    // -------------------------------------------------------------------------
    // Construction helpers
    // -------------------------------------------------------------------------

    pub fn identifier(&mut self, text: impl Into<String>) -> NodeIndex {
        self.alloc(NodeData::IdentifierName { text: text.into() })
    }

    pub fn generic_name(&mut self, text: impl Into<String>, type_arguments: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeData::GenericName {
            text: text.into(),
            type_arguments,
        })
    }

    pub fn qualified_name(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.alloc(NodeData::QualifiedName { left, right })
    }

    /// Build `A.B.C` as a left-nested chain of qualified names.
    ///
    /// A single segment yields a bare identifier. Returns `NodeIndex::NONE`
    /// for an empty path.
    pub fn dotted_name(&mut self, path: &str) -> NodeIndex {
        let mut result = NodeIndex::NONE;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            let right = self.identifier(segment);
            result = if result.is_none() {
                right
            } else {
                self.qualified_name(result, right)
            };
        }
        result
    }

    pub fn literal(&mut self, text: impl Into<String>) -> NodeIndex {
        self.alloc(NodeData::Literal { text: text.into() })
    }

    pub fn member_access(&mut self, expression: NodeIndex, name: impl Into<String>) -> NodeIndex {
        let name = self.identifier(name);
        self.alloc(NodeData::MemberAccess { expression, name })
    }

    pub fn argument(&mut self, expression: NodeIndex) -> NodeIndex {
        self.alloc(NodeData::Argument {
            name: None,
            ref_kind: RefKind::None,
            expression,
        })
    }

    pub fn named_argument(&mut self, name: impl Into<String>, expression: NodeIndex) -> NodeIndex {
        self.alloc(NodeData::Argument {
            name: Some(name.into()),
            ref_kind: RefKind::None,
            expression,
        })
    }

    pub fn invocation(&mut self, expression: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeData::Invocation {
            expression,
            arguments,
        })
    }

    pub fn extern_alias(&mut self, name: impl Into<String>) -> NodeIndex {
        self.alloc(NodeData::ExternAlias { name: name.into() })
    }

    pub fn using(&mut self, path: &str) -> NodeIndex {
        let name = self.dotted_name(path);
        self.alloc(NodeData::UsingDirective { alias: None, name })
    }

    pub fn namespace(
        &mut self,
        path: &str,
        externs: Vec<NodeIndex>,
        usings: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.dotted_name(path);
        self.alloc(NodeData::NamespaceDeclaration {
            name,
            externs,
            usings,
            members,
        })
    }

    pub fn class(&mut self, name: impl Into<String>, members: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeData::TypeDeclaration {
            keyword: "class".to_string(),
            name: name.into(),
            members,
        })
    }

    pub fn compilation_unit(
        &mut self,
        externs: Vec<NodeIndex>,
        usings: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.alloc(NodeData::CompilationUnit {
            externs,
            usings,
            attribute_lists: Vec::new(),
            members,
        })
    }

    // -------------------------------------------------------------------------
    // Printing
    // -------------------------------------------------------------------------

    /// Printed form of a name or simple expression, as the source would spell it.
    ///
    /// Declarations and statements print as their kind.
    #[must_use]
    pub fn print(&self, idx: NodeIndex) -> String {
        let mut out = String::new();
        self.print_into(idx, &mut out);
        out
    }

    fn print_into(&self, idx: NodeIndex, out: &mut String) {
        let Some(data) = self.data(idx) else {
            return;
        };
        match data {
            NodeData::IdentifierName { text } | NodeData::Literal { text } => out.push_str(text),
            NodeData::PredefinedType { keyword } => out.push_str(keyword),
            NodeData::GenericName {
                text,
                type_arguments,
            } => {
                out.push_str(text);
                if !type_arguments.is_empty() {
                    out.push('<');
                    for (i, arg) in type_arguments.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.print_into(*arg, out);
                    }
                    out.push('>');
                }
            }
            NodeData::QualifiedName { left, right } => {
                self.print_into(*left, out);
                out.push('.');
                self.print_into(*right, out);
            }
            NodeData::MemberAccess { expression, name } => {
                self.print_into(*expression, out);
                out.push('.');
                self.print_into(*name, out);
            }
            NodeData::Invocation {
                expression,
                arguments,
            } => {
                self.print_into(*expression, out);
                out.push('(');
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.print_into(*arg, out);
                }
                out.push(')');
            }
            NodeData::Argument {
                name,
                ref_kind,
                expression,
            } => {
                if let Some(name) = name {
                    out.push_str(name);
                    out.push_str(": ");
                }
                match ref_kind {
                    RefKind::Ref => out.push_str("ref "),
                    RefKind::Out => out.push_str("out "),
                    RefKind::In => out.push_str("in "),
                    RefKind::None => {}
                }
                self.print_into(*expression, out);
            }
            NodeData::ObjectCreation { ty, arguments } => {
                out.push_str("new ");
                self.print_into(*ty, out);
                out.push('(');
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.print_into(*arg, out);
                }
                out.push(')');
            }
            NodeData::TypeOf { ty } => {
                out.push_str("typeof(");
                self.print_into(*ty, out);
                out.push(')');
            }
            NodeData::Cast { ty, expression } => {
                out.push('(');
                self.print_into(*ty, out);
                out.push(')');
                self.print_into(*expression, out);
            }
            NodeData::Assignment { left, right } => {
                self.print_into(*left, out);
                out.push_str(" = ");
                self.print_into(*right, out);
            }
            NodeData::Opaque { text, .. } => out.push_str(text),
            other => out.push_str(other.kind_name()),
        }
    }
}

impl NodeData {
    /// Stable name of the node kind, for logging.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::CompilationUnit { .. } => "CompilationUnit",
            Self::ExternAlias { .. } => "ExternAlias",
            Self::UsingDirective { .. } => "UsingDirective",
            Self::NamespaceDeclaration { .. } => "NamespaceDeclaration",
            Self::TypeDeclaration { .. } => "TypeDeclaration",
            Self::MethodDeclaration { .. } => "MethodDeclaration",
            Self::LocalFunction { .. } => "LocalFunction",
            Self::Block { .. } => "Block",
            Self::VariableDeclaration { .. } => "VariableDeclaration",
            Self::VariableDeclarator { .. } => "VariableDeclarator",
            Self::ExpressionStatement { .. } => "ExpressionStatement",
            Self::Return { .. } => "Return",
            Self::Switch { .. } => "Switch",
            Self::SwitchSection { .. } => "SwitchSection",
            Self::CaseLabel { .. } => "CaseLabel",
            Self::CasePatternLabel { .. } => "CasePatternLabel",
            Self::IdentifierName { .. } => "IdentifierName",
            Self::GenericName { .. } => "GenericName",
            Self::QualifiedName { .. } => "QualifiedName",
            Self::PredefinedType { .. } => "PredefinedType",
            Self::Literal { .. } => "Literal",
            Self::MemberAccess { .. } => "MemberAccess",
            Self::Invocation { .. } => "Invocation",
            Self::Argument { .. } => "Argument",
            Self::ObjectCreation { .. } => "ObjectCreation",
            Self::TypeOf { .. } => "TypeOf",
            Self::Assignment { .. } => "Assignment",
            Self::Cast { .. } => "Cast",
            Self::IsPattern { .. } => "IsPattern",
            Self::QueryExpression { .. } => "QueryExpression",
            Self::QueryClause { .. } => "QueryClause",
            Self::JoinClause { .. } => "JoinClause",
            Self::JoinIntoClause { .. } => "JoinIntoClause",
            Self::GroupClause { .. } => "GroupClause",
            Self::QueryContinuation { .. } => "QueryContinuation",
            Self::Opaque { .. } => "Opaque",
        }
    }
}

#[cfg(test)]
#[path = "../tests/syntax_tests.rs"]
mod tests;
