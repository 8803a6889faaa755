//! Namespace flattening.
//!
//! ```text
//! using App.Gen;                      extern alias X;
//! namespace App.Main {                using System;
//!     extern alias X;         =>      class A {}
//!     using System;                   class B {}
//!     class A {}
//!     namespace Inner { class B {} }
//! }
//! ```
//!
//! Every top-level namespace whose name starts with the root prefix is
//! dissolved, recursively, and its extern aliases, imports and leaf members
//! move to the unit. Imports that point into the root are dropped since the
//! names they bring in are now at the top level.

use cslua_common::NodeIndex;
use cslua_model::{NodeArena, NodeData};
use tracing::debug;

#[derive(Default)]
struct Buckets {
    externs: Vec<NodeIndex>,
    usings: Vec<NodeIndex>,
    members: Vec<NodeIndex>,
}

/// Flatten the compilation unit `unit`, returning the new unit node.
///
/// A node that is not a compilation unit is returned unchanged.
pub fn flatten(arena: &mut NodeArena, unit: NodeIndex, root_prefix: &str) -> NodeIndex {
    let Some(NodeData::CompilationUnit {
        externs,
        usings,
        attribute_lists,
        members,
    }) = arena.data(unit).cloned()
    else {
        return unit;
    };

    let mut out = Buckets {
        externs,
        ..Buckets::default()
    };
    out.usings = usings
        .into_iter()
        .filter(|&using| !targets_root(arena, using, root_prefix))
        .collect();

    let mut dissolved = 0usize;
    for member in members {
        if namespace_name(arena, member).is_some_and(|name| name.starts_with(root_prefix)) {
            dissolved += 1;
            collect(arena, member, root_prefix, &mut out);
        } else {
            out.members.push(member);
        }
    }

    let flattened = arena.alloc(NodeData::CompilationUnit {
        externs: out.externs,
        usings: out.usings,
        attribute_lists,
        members: out.members,
    });
    arena.copy_trivia(unit, flattened);
    debug!(root_prefix, dissolved, "flattened compilation unit");
    flattened
}

fn collect(arena: &NodeArena, namespace: NodeIndex, root_prefix: &str, out: &mut Buckets) {
    let Some(NodeData::NamespaceDeclaration {
        externs,
        usings,
        members,
        ..
    }) = arena.data(namespace)
    else {
        return;
    };
    out.externs.extend(externs.iter().copied());
    out.usings.extend(
        usings
            .iter()
            .copied()
            .filter(|&using| !targets_root(arena, using, root_prefix)),
    );
    for &member in members {
        if arena.data(member).is_some_and(NodeData::is_namespace) {
            collect(arena, member, root_prefix, out);
        } else {
            out.members.push(member);
        }
    }
}

fn namespace_name(arena: &NodeArena, node: NodeIndex) -> Option<String> {
    match arena.data(node)? {
        NodeData::NamespaceDeclaration { name, .. } => Some(arena.print(*name)),
        _ => None,
    }
}

fn targets_root(arena: &NodeArena, using: NodeIndex, root_prefix: &str) -> bool {
    match arena.data(using) {
        Some(NodeData::UsingDirective { name, .. }) => arena.print(*name).starts_with(root_prefix),
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/flatten_tests.rs"]
mod tests;
