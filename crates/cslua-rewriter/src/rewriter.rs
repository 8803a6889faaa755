//! Single-pass tree rewriter.
//!
//! Walks a compilation unit depth-first. Each node is either passed through
//! (children visited), replaced by a shorter name, or annotated: the
//! diagnostic message is prepended to the node's leading comments as
//! `/* message */`, forwarded to the sink and collected into the output.
//! Diagnostics accumulate; a node may carry several.
//!
//! Replacement nodes are freshly allocated, so semantic queries are always
//! made with the original handles, captured before children are visited.

use cslua_common::diagnostics::diagnostic_codes;
use cslua_common::{Diagnostic, NodeIndex};
use cslua_model::{
    BoundModel, BoundUnit, MemberSymbol, MethodKind, NodeArena, NodeData, ProgramIndex,
    SemanticModel, Symbol, SymbolId,
};
use cslua_rules::RuleTable;
use tracing::{debug, trace, warn};

use crate::arguments::{self, ArgumentPlan};
use crate::classifier::{SymbolClassifier, TypePosition};
use crate::flatten::flatten;
use crate::namespaces::KnownNamespaces;
use crate::sink::{DiagnosticSink, TracingSink};

/// Maximum recursion depth for tree traversal to prevent stack overflow
const MAX_AST_DEPTH: u32 = 500;

/// Result of rewriting one unit.
#[derive(Clone, Debug, Default)]
pub struct RewriteOutput {
    /// Root of the rewritten (and flattened) unit.
    pub root: NodeIndex,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct TreeRewriter<'a> {
    file: &'a str,
    arena: &'a mut NodeArena,
    model: &'a dyn SemanticModel,
    classifier: SymbolClassifier<'a>,
    namespaces: &'a KnownNamespaces,
    sink: &'a dyn DiagnosticSink,
    diagnostics: Vec<Diagnostic>,
    /// Current recursion depth for stack overflow protection
    visit_depth: u32,
}

impl<'a> TreeRewriter<'a> {
    #[must_use]
    pub fn new(
        file: &'a str,
        arena: &'a mut NodeArena,
        model: &'a dyn SemanticModel,
        rules: RuleTable<'a>,
        namespaces: &'a KnownNamespaces,
        sink: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            file,
            arena,
            model,
            classifier: SymbolClassifier::new(model, rules),
            namespaces,
            sink,
            diagnostics: Vec::new(),
            visit_depth: 0,
        }
    }

    /// Rewrite the tree under `root` and return the new root.
    #[tracing::instrument(level = "debug", skip(self), fields(file = self.file))]
    pub fn rewrite(mut self, root: NodeIndex) -> RewriteOutput {
        let root = self.visit(root, false);
        debug!(diagnostics = self.diagnostics.len(), "rewrite complete");
        RewriteOutput {
            root,
            diagnostics: self.diagnostics,
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    fn visit(&mut self, idx: NodeIndex, invocation_target: bool) -> NodeIndex {
        let Some(data) = self.arena.data(idx).cloned() else {
            return idx;
        };
        if self.visit_depth >= MAX_AST_DEPTH {
            warn!(file = self.file, %idx, "tree too deep, leaving subtree unvisited");
            return idx;
        }
        self.visit_depth += 1;

        let result = match data {
            NodeData::QualifiedName { left, right } => self.visit_qualified_name(idx, left, right),
            NodeData::MemberAccess { expression, name } => {
                self.visit_member_access(idx, expression, name, invocation_target)
            }
            NodeData::Invocation {
                expression,
                arguments,
            } => self.visit_invocation(idx, expression, arguments),
            NodeData::ObjectCreation { ty, .. } | NodeData::TypeOf { ty } => {
                self.visit_children(idx, data);
                self.check_type_use(idx, ty);
                idx
            }
            NodeData::VariableDeclarator { initializer, .. } => {
                self.visit_children(idx, data);
                if initializer.is_some() {
                    let source = self.model.type_info(initializer);
                    let target = self.model.type_info(idx);
                    self.check_conversion(idx, source, target);
                }
                idx
            }
            NodeData::Assignment { left, right } => {
                self.visit_children(idx, data);
                let source = self.model.type_info(right);
                let target = self.model.type_info(left);
                self.check_conversion(idx, source, target);
                idx
            }
            NodeData::Cast { ty, expression } => {
                self.visit_children(idx, data);
                if !self.is_user_conversion(idx) {
                    let source = self.model.type_info(expression);
                    let target = self.model.symbol_info(ty).or_else(|| self.model.type_info(idx));
                    self.check_conversion(idx, source, target);
                }
                idx
            }
            NodeData::JoinClause { .. } => self.unsupported_query(idx, data, "join"),
            NodeData::JoinIntoClause { .. } => self.unsupported_query(idx, data, "join into"),
            NodeData::GroupClause { .. } => self.unsupported_query(idx, data, "group"),
            NodeData::QueryContinuation { .. } => self.unsupported_query(idx, data, "into"),
            NodeData::IsPattern { .. } => {
                self.report(idx, diagnostic_codes::UNSUPPORTED_IS_PATTERN, &[]);
                self.visit_children(idx, data);
                idx
            }
            NodeData::CasePatternLabel { .. } => {
                self.report(idx, diagnostic_codes::UNSUPPORTED_CASE_PATTERN, &[]);
                self.visit_children(idx, data);
                idx
            }
            NodeData::LocalFunction { .. } => {
                self.report(idx, diagnostic_codes::UNSUPPORTED_LOCAL_FUNCTION, &[]);
                self.visit_children(idx, data);
                idx
            }
            NodeData::CompilationUnit { .. } => {
                self.visit_children(idx, data);
                let root = self.namespaces.root();
                if root.is_empty() {
                    idx
                } else {
                    flatten(self.arena, idx, root)
                }
            }
            _ => {
                self.visit_children(idx, data);
                idx
            }
        };

        self.visit_depth -= 1;
        result
    }

    /// Visit every child of `idx` and store the (possibly replaced) handles.
    fn visit_children(&mut self, idx: NodeIndex, mut data: NodeData) {
        data.for_each_child_mut(|child| *child = self.visit(*child, false));
        if let Some(node) = self.arena.get_mut(idx) {
            node.data = data;
        }
    }

    fn unsupported_query(&mut self, idx: NodeIndex, data: NodeData, keyword: &str) -> NodeIndex {
        self.report(idx, diagnostic_codes::UNSUPPORTED_QUERY_SYNTAX, &[keyword]);
        self.visit_children(idx, data);
        idx
    }

    // =========================================================================
    // Names
    // =========================================================================

    fn visit_qualified_name(
        &mut self,
        idx: NodeIndex,
        left: NodeIndex,
        right: NodeIndex,
    ) -> NodeIndex {
        if self.namespaces.contains(&self.arena.print(idx)) {
            return idx;
        }

        let left_text = self.arena.print(left);
        if self.namespaces.contains(&left_text) {
            let name = self.visit(right, false);
            self.arena.copy_trivia(idx, name);
            trace!(from = %left_text, "dropped namespace qualifier");
            return name;
        }

        if let Some(ns) = self.namespaces.longest_prefix_of(&left_text) {
            let remainder = &left_text[ns.len() + 1..];
            let new_left = self.arena.dotted_name(remainder);
            let name = self.visit(right, false);
            let shortened = self.arena.qualified_name(new_left, name);
            self.arena.copy_trivia(idx, shortened);
            trace!(from = %left_text, to = remainder, "stripped namespace prefix");
            return shortened;
        }

        let new_left = self.visit(left, false);
        let new_right = self.visit(right, false);
        if let Some(node) = self.arena.get_mut(idx) {
            node.data = NodeData::QualifiedName {
                left: new_left,
                right: new_right,
            };
        }
        idx
    }

    fn is_namespace_qualifier(&self, expression: NodeIndex) -> bool {
        let Some(NodeData::IdentifierName { text }) = self.arena.data(expression) else {
            return false;
        };
        (self.namespaces.contains(text) || self.namespaces.contains_component(text))
            && self.model.symbol_info(expression).is_none()
    }

    // =========================================================================
    // Member access & invocation
    // =========================================================================

    fn visit_member_access(
        &mut self,
        idx: NodeIndex,
        expression: NodeIndex,
        name: NodeIndex,
        invocation_target: bool,
    ) -> NodeIndex {
        let result = if self.is_namespace_qualifier(expression) {
            let name = self.visit(name, false);
            self.arena.copy_trivia(idx, name);
            name
        } else {
            let new_expression = self.visit(expression, false);
            let new_name = self.visit(name, false);
            if let Some(node) = self.arena.get_mut(idx) {
                node.data = NodeData::MemberAccess {
                    expression: new_expression,
                    name: new_name,
                };
            }
            idx
        };
        self.check_member_access(idx, result, invocation_target);
        result
    }

    fn check_member_access(
        &mut self,
        idx: NodeIndex,
        report_on: NodeIndex,
        invocation_target: bool,
    ) {
        let model = self.model;
        let Some(id) = model.symbol_info(idx) else {
            return;
        };
        let symbols = model.symbols();
        let Some(symbol) = symbols.get(id) else {
            return;
        };
        let classifier = self.classifier;
        match symbol {
            Symbol::Event(member) if classifier.is_extern(id) => {
                let name = classifier.member_name(id);
                self.report(report_on, diagnostic_codes::UNSUPPORTED_EXTERN_EVENT, &[&name]);
                self.check_member_type(idx, report_on, member);
            }
            Symbol::Property(member) if classifier.is_extern(id) => {
                if classifier.is_illegal_property(id) {
                    let name = classifier.member_name(id);
                    let code = diagnostic_codes::UNSUPPORTED_EXTERN_PROPERTY;
                    self.report(report_on, code, &[&name]);
                }
                self.check_member_type(idx, report_on, member);
            }
            Symbol::Field(member) if classifier.is_extern(id) => {
                if classifier.is_illegal_field(id) {
                    let name = classifier.member_name(id);
                    self.report(report_on, diagnostic_codes::UNSUPPORTED_EXTERN_FIELD, &[&name]);
                }
                self.check_member_type(idx, report_on, member);
            }
            Symbol::Method(method)
                if !invocation_target
                    && classifier.is_extern(method.containing_type)
                    && classifier.is_illegal_method(id) =>
            {
                let name = classifier.member_name(id);
                self.report(report_on, diagnostic_codes::UNSUPPORTED_EXTERN_METHOD, &[&name]);
            }
            _ => {}
        }
    }

    /// Result type of an extern member access, unless its host is exempt.
    fn check_member_type(&mut self, idx: NodeIndex, report_on: NodeIndex, member: &MemberSymbol) {
        let classifier = self.classifier;
        if classifier.is_exempt_host(member.containing_type) {
            return;
        }
        let ty = self.model.type_info(idx).unwrap_or(member.ty);
        if !classifier.legality_of_type(ty, TypePosition::Parameter) {
            let name = classifier.display_name(ty);
            self.report(
                report_on,
                diagnostic_codes::UNSUPPORTED_EXTERN_TYPE_FROM_MEMBER_ACCESS,
                &[&name],
            );
        }
    }

    fn visit_invocation(
        &mut self,
        idx: NodeIndex,
        expression: NodeIndex,
        arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        let method = self
            .model
            .symbol_info(idx)
            .or_else(|| self.model.symbol_info(expression))
            .filter(|&id| self.model.symbols().method(id).is_some());
        let plan = method.map(|id| {
            let receiver = self.extension_receiver(id, expression);
            arguments::plan(self.model, self.arena, id, receiver, &arguments)
        });

        let new_expression = self.visit(expression, true);
        let new_arguments: Vec<NodeIndex> = arguments
            .iter()
            .map(|&arg| self.visit(arg, false))
            .collect();
        if let Some(node) = self.arena.get_mut(idx) {
            node.data = NodeData::Invocation {
                expression: new_expression,
                arguments: new_arguments,
            };
        }

        if let (Some(id), Some(plan)) = (method, plan) {
            self.check_invocation(idx, id, &plan);
        }
        idx
    }

    /// Instance expression of an extension method called with member syntax.
    fn extension_receiver(&self, method: SymbolId, expression: NodeIndex) -> Option<NodeIndex> {
        let callee = self.model.symbols().method(method)?;
        if !callee.is_extension {
            return None;
        }
        let Some(NodeData::MemberAccess {
            expression: receiver,
            ..
        }) = self.arena.data(expression)
        else {
            return None;
        };
        let static_call = self
            .model
            .symbol_info(*receiver)
            .and_then(|id| self.model.symbols().get(id))
            .is_some_and(|symbol| matches!(symbol, Symbol::Type(_)));
        (!static_call).then_some(*receiver)
    }

    fn check_invocation(&mut self, idx: NodeIndex, id: SymbolId, plan: &ArgumentPlan) {
        let classifier = self.classifier;
        let model = self.model;
        let Some(method) = model.symbols().method(id) else {
            return;
        };
        if !classifier.is_extern(id) {
            return;
        }

        if method.is_extension {
            if !classifier.is_legal_extension(id) {
                let name = classifier.member_name(id);
                self.report(idx, diagnostic_codes::UNSUPPORTED_EXTENSION_METHOD, &[&name]);
            }
        } else if classifier.is_illegal_method(id) {
            let name = classifier.member_name(id);
            self.report(idx, diagnostic_codes::UNSUPPORTED_EXTERN_METHOD, &[&name]);
        }

        // Exempt calls skip the signature and the container checks alike.
        let exempt = classifier.is_exempt_host(method.containing_type)
            || (method.is_generic() && classifier.is_legal_generic_method(id));
        if exempt {
            return;
        }

        let signature = method
            .parameters
            .iter()
            .map(|p| p.ty)
            .chain(method.return_type);
        for ty in signature {
            if !classifier.legality_of_type(ty, TypePosition::Parameter) {
                let name = classifier.display_name(ty);
                self.report(
                    idx,
                    diagnostic_codes::UNSUPPORTED_EXTERN_TYPE_FROM_INVOCATION,
                    &[&name],
                );
            }
        }

        for (i, parameter) in method.parameters.iter().enumerate() {
            if !classifier.is_system_container_interface(parameter.ty) {
                continue;
            }
            let Some(argument_ty) = plan
                .source_expression(i)
                .and_then(|expr| model.type_info(expr))
            else {
                continue;
            };
            let local_container = model
                .symbols()
                .type_symbol(argument_ty)
                .is_some_and(|ty| !ty.is_interface() && !classifier.is_extern(argument_ty));
            if local_container {
                let local = classifier.display_name(argument_ty);
                let interface = classifier.display_name(parameter.ty);
                self.report(
                    idx,
                    diagnostic_codes::LOCAL_CONTAINER_AS_EXTERN_INTERFACE,
                    &[&local, &interface],
                );
            }
        }
    }

    // =========================================================================
    // Types & conversions
    // =========================================================================

    /// Constructed or `typeof`-queried type.
    fn check_type_use(&mut self, idx: NodeIndex, ty_node: NodeIndex) {
        let Some(ty) = self
            .model
            .symbol_info(ty_node)
            .filter(|&id| self.model.symbols().type_symbol(id).is_some())
            .or_else(|| self.model.type_info(idx))
        else {
            return;
        };
        let classifier = self.classifier;
        if !classifier.legality_of_type(ty, TypePosition::General) {
            let name = classifier.display_name(ty);
            self.report(idx, diagnostic_codes::UNSUPPORTED_EXTERN_TYPE, &[&name]);
        }
    }

    fn is_user_conversion(&self, cast: NodeIndex) -> bool {
        self.model
            .symbol_info(cast)
            .and_then(|id| self.model.symbols().method(id))
            .is_some_and(|m| matches!(m.kind, MethodKind::Conversion))
    }

    fn check_conversion(
        &mut self,
        idx: NodeIndex,
        source: Option<SymbolId>,
        target: Option<SymbolId>,
    ) {
        let (Some(source), Some(target)) = (source, target) else {
            return;
        };
        let classifier = self.classifier;
        if !classifier.is_legal_conversion(source, target) {
            let from = classifier.display_name(source);
            let to = classifier.display_name(target);
            self.report(idx, diagnostic_codes::UNSUPPORTED_CONVERSION, &[&from, &to]);
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn report(&mut self, node: NodeIndex, code: u32, args: &[&str]) {
        let diagnostic = Diagnostic::from_code(self.file, node, code, args);
        let comment = format!("/* {} */", diagnostic.message_text);
        self.arena.prepend_comment(node, comment);
        self.sink.log(node, &diagnostic.message_text);
        debug!(file = self.file, %node, code, "portability violation");
        self.diagnostics.push(diagnostic);
    }
}

/// Rewrite one bound unit in place; `unit.root` is updated to the new root.
#[tracing::instrument(level = "debug", skip_all, fields(file = %unit.file))]
pub fn rewrite_unit(
    unit: &mut BoundUnit,
    program: &ProgramIndex,
    rules: RuleTable<'_>,
    namespaces: &KnownNamespaces,
) -> RewriteOutput {
    let BoundUnit {
        file,
        arena,
        root,
        bindings,
    } = unit;
    let model = BoundModel::new(program, bindings);
    let sink = TracingSink::new(file);
    let output = TreeRewriter::new(file, arena, &model, rules, namespaces, &sink).rewrite(*root);
    *root = output.root;
    output
}

#[cfg(test)]
#[path = "../tests/rewriter_tests.rs"]
mod tests;
