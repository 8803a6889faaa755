//! Line up an invocation's arguments with the callee's parameters.
//!
//! Lua has no named or optional arguments, so every call site is expanded to
//! one slot per declared parameter, in declaration order:
//!
//! ```text
//! void f(int a, int b = 5, int c = 7);
//! f(1, c: 9)   =>   [Positional(1), ResolvedDefault(5), Named(9)]
//! ```
//!
//! Defaults are re-resolved in the scope of the declaration so the emitted
//! expression means the same thing at the call site. When that is not
//! possible the slot degrades to `ConstantOnlyDefault` instead of failing.

use cslua_common::NodeIndex;
use cslua_model::{
    ConstantValue, NodeArena, NodeData, RefKind, ResolvedExpr, SemanticModel, SymbolId,
};
use smallvec::SmallVec;
use tracing::trace;

#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentSlot {
    /// Supplied positionally; holds the argument's expression.
    Positional(NodeIndex),
    /// Supplied by name.
    Named(NodeIndex),
    /// Omitted; the default re-resolved at its declaration site.
    ResolvedDefault {
        value: ConstantValue,
        expr: ResolvedExpr,
    },
    /// Omitted; only the constant value is known.
    ConstantOnlyDefault { value: ConstantValue },
    /// `out` argument; the back end emits a placeholder and assigns after the call.
    OutPlaceholder { source: NodeIndex },
    /// Trailing elements of a `params` parameter, possibly none.
    ParamsArray(SmallVec<[NodeIndex; 4]>),
    /// No argument and no default.
    Missing { parameter: usize },
}

impl ArgumentSlot {
    /// The single source expression bound to the slot, if any.
    #[must_use]
    pub const fn source(&self) -> Option<NodeIndex> {
        match self {
            Self::Positional(expr) | Self::Named(expr) => Some(*expr),
            Self::OutPlaceholder { source } => Some(*source),
            _ => None,
        }
    }
}

/// Ordered slots of one call site.
///
/// The first `parameter_count` slots correspond to the declared parameters;
/// anything after them is a surplus argument kept so nothing is dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArgumentPlan {
    slots: SmallVec<[ArgumentSlot; 4]>,
    parameter_count: usize,
}

impl ArgumentPlan {
    #[must_use]
    pub fn slots(&self) -> &[ArgumentSlot] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub const fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    #[must_use]
    pub fn slot_for_parameter(&self, parameter: usize) -> Option<&ArgumentSlot> {
        if parameter >= self.parameter_count {
            return None;
        }
        self.slots.get(parameter)
    }

    #[must_use]
    pub fn source_expression(&self, parameter: usize) -> Option<NodeIndex> {
        self.slot_for_parameter(parameter)
            .and_then(ArgumentSlot::source)
    }

    /// Arguments that matched no parameter.
    #[must_use]
    pub fn surplus(&self) -> &[ArgumentSlot] {
        self.slots.get(self.parameter_count..).unwrap_or_default()
    }
}

struct NamedArgument<'t> {
    name: &'t str,
    expression: NodeIndex,
    used: bool,
}

/// Plan the call of `method` with the argument nodes `arguments`.
///
/// `receiver` is the instance expression of an extension method called with
/// member syntax (`xs.Where(p)`); it binds to the first parameter. Argument
/// nodes that are not `Argument` nodes are taken as positional expressions.
/// A symbol that is not a method yields a plan of positional surplus only.
#[must_use]
pub fn plan(
    model: &dyn SemanticModel,
    arena: &NodeArena,
    method: SymbolId,
    receiver: Option<NodeIndex>,
    arguments: &[NodeIndex],
) -> ArgumentPlan {
    let mut positional: Vec<NodeIndex> = Vec::with_capacity(arguments.len() + 1);
    let mut named: Vec<NamedArgument<'_>> = Vec::new();
    positional.extend(receiver);
    for &arg in arguments {
        match arena.data(arg) {
            Some(NodeData::Argument {
                name: Some(name),
                expression,
                ..
            }) => named.push(NamedArgument {
                name,
                expression: *expression,
                used: false,
            }),
            Some(NodeData::Argument { expression, .. }) => positional.push(*expression),
            _ => positional.push(arg),
        }
    }

    let Some(callee) = model.symbols().method(method) else {
        return ArgumentPlan {
            slots: positional.into_iter().map(ArgumentSlot::Positional).collect(),
            parameter_count: 0,
        };
    };

    let mut slots: SmallVec<[ArgumentSlot; 4]> = SmallVec::new();
    let mut next_positional = 0;
    for (i, parameter) in callee.parameters.iter().enumerate() {
        let by_name = named
            .iter_mut()
            .find(|arg| !arg.used && arg.name == parameter.name);

        if parameter.is_params {
            let mut elements: SmallVec<[NodeIndex; 4]> = SmallVec::new();
            if next_positional < positional.len() {
                elements.extend(positional[next_positional..].iter().copied());
                next_positional = positional.len();
            } else if let Some(arg) = by_name {
                arg.used = true;
                elements.push(arg.expression);
            }
            slots.push(ArgumentSlot::ParamsArray(elements));
            continue;
        }

        let is_out = matches!(parameter.ref_kind, RefKind::Out);
        if next_positional < positional.len() {
            let expr = positional[next_positional];
            next_positional += 1;
            slots.push(if is_out {
                ArgumentSlot::OutPlaceholder { source: expr }
            } else {
                ArgumentSlot::Positional(expr)
            });
            continue;
        }

        if let Some(arg) = by_name {
            arg.used = true;
            slots.push(if is_out {
                ArgumentSlot::OutPlaceholder {
                    source: arg.expression,
                }
            } else {
                ArgumentSlot::Named(arg.expression)
            });
            continue;
        }

        slots.push(match &parameter.default {
            Some(value) => default_slot(model, method, i, value),
            None => ArgumentSlot::Missing { parameter: i },
        });
    }

    let parameter_count = slots.len();
    slots.extend(
        positional[next_positional.min(positional.len())..]
            .iter()
            .map(|&expr| ArgumentSlot::Positional(expr)),
    );
    slots.extend(
        named
            .iter()
            .filter(|arg| !arg.used)
            .map(|arg| ArgumentSlot::Named(arg.expression)),
    );

    ArgumentPlan {
        slots,
        parameter_count,
    }
}

fn default_slot(
    model: &dyn SemanticModel,
    method: SymbolId,
    parameter: usize,
    value: &ConstantValue,
) -> ArgumentSlot {
    let resolved = model
        .default_value_text(method, parameter)
        .and_then(|text| model.resolve_in_declaration_scope(method, text));
    match resolved {
        Some(expr) => ArgumentSlot::ResolvedDefault {
            value: value.clone(),
            expr,
        },
        None => {
            trace!(method = method.0, parameter, "default value kept as constant only");
            ArgumentSlot::ConstantOnlyDefault {
                value: value.clone(),
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/arguments_tests.rs"]
mod tests;
