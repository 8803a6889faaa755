//! Namespaces the pass treats as "ours".
//!
//! The root namespace and every namespace below it. Qualified names and
//! member accesses that spell one of them are shortened by the rewriter,
//! since flattening removes the enclosing declarations.

use cslua_model::{NamespaceId, SymbolArena};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct KnownNamespaces {
    root: String,
    /// Full dotted names, root first, then breadth-first.
    names: IndexSet<String>,
    /// Dotted segments of known names from the root's last segment down.
    /// Ancestors of the root are not included; `App` in root `App.Gen`
    /// still names the unflattened `App.Main`.
    components: FxHashSet<String>,
}

impl KnownNamespaces {
    /// Collect `root` and its descendants from the symbol model.
    ///
    /// An empty or unknown root yields an empty set.
    #[must_use]
    pub fn collect(symbols: &SymbolArena, root: &str) -> Self {
        let mut known = Self {
            root: root.to_string(),
            ..Self::default()
        };
        if root.is_empty() {
            return known;
        }
        let Some(start) = symbols.namespace_by_path(root) else {
            debug!(root, "root namespace not present in symbol model");
            return known;
        };

        let mut queue: Vec<NamespaceId> = vec![start];
        let mut next = 0;
        while let Some(&ns) = queue.get(next) {
            next += 1;
            known.insert(symbols.namespace_path(ns));
            if let Some(data) = symbols.namespace(ns) {
                queue.extend(data.children.iter().copied());
            }
        }
        debug!(root, count = known.names.len(), "collected known namespaces");
        known
    }

    /// Build from explicit dotted names.
    #[must_use]
    pub fn from_names<'n>(root: &str, names: impl IntoIterator<Item = &'n str>) -> Self {
        let mut known = Self {
            root: root.to_string(),
            ..Self::default()
        };
        for name in names {
            known.insert(name.to_string());
        }
        known
    }

    fn insert(&mut self, name: String) {
        if name.is_empty() {
            return;
        }
        let above_root = self.root.split('.').count().saturating_sub(1);
        for segment in name.split('.').skip(above_root) {
            self.components.insert(segment.to_string());
        }
        self.names.insert(name);
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// `true` if `segment` is a dotted component of a known namespace at or
    /// below the root.
    #[must_use]
    pub fn contains_component(&self, segment: &str) -> bool {
        self.components.contains(segment)
    }

    /// Longest known namespace `ns` such that `text` starts with `ns.`.
    #[must_use]
    pub fn longest_prefix_of(&self, text: &str) -> Option<&str> {
        self.names
            .iter()
            .filter(|ns| {
                text.strip_prefix(ns.as_str())
                    .and_then(|rest| rest.strip_prefix('.'))
                    .is_some_and(|rest| !rest.is_empty())
            })
            .max_by_key(|ns| ns.len())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/namespaces_tests.rs"]
mod tests;
