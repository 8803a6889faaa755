//! Canonical names.
//!
//! A canonical name is the dotted path of a symbol's containing namespaces and
//! types followed by its own name. Type segments carry their type-parameter
//! names joined by `_`, so `Dictionary<TKey, TValue>` is spelled
//! `System.Collections.Generic.Dictionary_TKey_TValue` no matter how it is
//! instantiated.
//!
//! The extended form appends the instantiation: `base|arg1, arg2`. Delegate
//! arguments are quoted, free type parameters stay bare.
//!
//! ```text
//! List<int>                     System.Collections.Generic.List_T|System.Int32
//! Dictionary<string, Action>    System.Collections.Generic.Dictionary_TKey_TValue|System.String, "System.Action"
//! List<T> (inside Foo<T>)       System.Collections.Generic.List_T|T
//! ```

use cslua_model::{Symbol, SymbolArena, SymbolId, TypeKind};

/// Name of a symbol with its own type-parameter names appended (`Map_K_V`).
#[must_use]
pub fn name_with_type_parameters(symbols: &SymbolArena, id: SymbolId) -> String {
    let Some(symbol) = symbols.get(id) else {
        return String::new();
    };
    match symbol {
        Symbol::Type(ty) => {
            let mut name = ty.name.clone();
            for param in &ty.type_parameters {
                name.push('_');
                name.push_str(param);
            }
            name
        }
        other => other.name().to_string(),
    }
}

/// Canonical dotted name of `id`.
///
/// Containing types are walked innermost to outermost, then the namespace
/// chain of the outermost type. With `include_self == false` only the
/// container path is produced.
#[must_use]
pub fn canonical_name(symbols: &SymbolArena, id: SymbolId, include_self: bool) -> String {
    let Some(symbol) = symbols.get(id) else {
        return String::new();
    };
    let mut segments: Vec<String> = Vec::new();
    if include_self {
        segments.push(name_with_type_parameters(symbols, id));
    }

    let mut namespace = symbol.namespace();
    let mut containing = symbol.containing_type();
    while let Some(ct) = containing {
        segments.push(name_with_type_parameters(symbols, ct));
        let Some(ct_symbol) = symbols.get(ct) else {
            break;
        };
        namespace = ct_symbol.namespace();
        containing = ct_symbol.containing_type();
    }

    while let Some(ns) = namespace {
        let Some(data) = symbols.namespace(ns) else {
            break;
        };
        if data.name.is_empty() {
            break;
        }
        segments.push(data.name.clone());
        namespace = data.parent;
    }

    segments.reverse();
    segments.join(".")
}

/// Append the instantiation of a generic symbol to `base`.
///
/// Non-generic symbols return `base` unchanged. A generic definition (no
/// concrete arguments) spells its own type parameters.
#[must_use]
pub fn extended_name(symbols: &SymbolArena, base: &str, id: SymbolId) -> String {
    let Some(symbol) = symbols.get(id) else {
        return base.to_string();
    };
    let (parameters, arguments) = match symbol {
        Symbol::Type(ty) => (&ty.type_parameters, &ty.type_arguments),
        Symbol::Method(m) => (&m.type_parameters, &m.type_arguments),
        _ => return base.to_string(),
    };
    if parameters.is_empty() {
        return base.to_string();
    }

    let rendered: Vec<String> = if arguments.is_empty() {
        parameters.clone()
    } else {
        arguments
            .iter()
            .map(|&arg| type_argument_name(symbols, arg))
            .collect()
    };
    format!("{base}|{}", rendered.join(", "))
}

fn type_argument_name(symbols: &SymbolArena, arg: SymbolId) -> String {
    match symbols.type_symbol(arg).map(|t| t.kind) {
        Some(TypeKind::Delegate) => format!("\"{}\"", canonical_name(symbols, arg, true)),
        Some(TypeKind::TypeParameter) => symbols
            .get(arg)
            .map(|s| s.name().to_string())
            .unwrap_or_default(),
        _ => canonical_name(symbols, arg, true),
    }
}

/// `ContainingType.member` key used by the method/property/field lists.
#[must_use]
pub fn member_key(symbols: &SymbolArena, containing_type: SymbolId, member: &str) -> String {
    format!("{}.{member}", canonical_name(symbols, containing_type, true))
}

#[cfg(test)]
#[path = "../tests/naming_tests.rs"]
mod tests;
