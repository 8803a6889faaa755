//! Names the policy was asked about and did not contain.
//!
//! `MissLog` is shared across every unit of a run (and across rayon workers),
//! so each bucket is a concurrent set. Recording the same name twice is a
//! no-op. `MissReport` is the sorted snapshot written next to the output; it
//! can be turned back into a rule document so accepted names can be pasted
//! into the policy file.

use dashmap::{DashMap, DashSet};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::document::{RuleDocument, RuleEntry, RuleList, RuleSection};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MissBucket {
    IllegalGenericType,
    IllegalGenericMethod,
    IllegalParameterGenericType,
    IllegalExtension,
    /// Host type of an accessed member; kept apart from plain generic misses.
    AccessMemberOfIllegalGenericType,
}

impl MissBucket {
    pub const ALL: [Self; 5] = [
        Self::IllegalGenericType,
        Self::IllegalGenericMethod,
        Self::IllegalParameterGenericType,
        Self::IllegalExtension,
        Self::AccessMemberOfIllegalGenericType,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IllegalGenericType => "IllegalGenericTypes",
            Self::IllegalGenericMethod => "IllegalGenericMethods",
            Self::IllegalParameterGenericType => "IllegalParameterGenericTypes",
            Self::IllegalExtension => "IllegalExtensions",
            Self::AccessMemberOfIllegalGenericType => "AccessMemberOfIllegalGenericTypes",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::IllegalGenericType => 0,
            Self::IllegalGenericMethod => 1,
            Self::IllegalParameterGenericType => 2,
            Self::IllegalExtension => 3,
            Self::AccessMemberOfIllegalGenericType => 4,
        }
    }
}

#[derive(Debug, Default)]
pub struct MissLog {
    buckets: [DashSet<String>; 5],
    conversions: DashMap<String, FxHashSet<String>>,
}

impl MissLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a miss. Returns `true` the first time a name is seen.
    pub fn record(&self, bucket: MissBucket, name: &str) -> bool {
        let set = &self.buckets[bucket.index()];
        if set.contains(name) {
            return false;
        }
        let inserted = set.insert(name.to_string());
        if inserted {
            trace!(bucket = bucket.name(), name, "recorded rule miss");
        }
        inserted
    }

    /// Record an unlisted conversion. Returns `true` the first time the pair is seen.
    pub fn record_conversion(&self, source: &str, target: &str) -> bool {
        let inserted = self
            .conversions
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string());
        if inserted {
            trace!(source, target, "recorded conversion miss");
        }
        inserted
    }

    #[must_use]
    pub fn contains(&self, bucket: MissBucket, name: &str) -> bool {
        self.buckets[bucket.index()].contains(name)
    }

    #[must_use]
    pub fn contains_conversion(&self, source: &str, target: &str) -> bool {
        self.conversions
            .get(source)
            .is_some_and(|targets| targets.contains(target))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(DashSet::is_empty) && self.conversions.is_empty()
    }

    #[must_use]
    pub fn report(&self) -> MissReport {
        let sorted = |bucket: MissBucket| {
            let mut names: Vec<String> = self.buckets[bucket.index()]
                .iter()
                .map(|name| name.key().clone())
                .collect();
            names.sort();
            names
        };
        let mut conversions: Vec<(String, String)> = self
            .conversions
            .iter()
            .flat_map(|entry| {
                let source = entry.key().clone();
                entry
                    .value()
                    .iter()
                    .map(|target| (source.clone(), target.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        conversions.sort();

        MissReport {
            illegal_generic_types: sorted(MissBucket::IllegalGenericType),
            illegal_generic_methods: sorted(MissBucket::IllegalGenericMethod),
            illegal_parameter_generic_types: sorted(MissBucket::IllegalParameterGenericType),
            illegal_extensions: sorted(MissBucket::IllegalExtension),
            access_member_of_illegal_generic_types: sorted(
                MissBucket::AccessMemberOfIllegalGenericType,
            ),
            illegal_conversions: conversions,
        }
    }
}

/// Sorted snapshot of a `MissLog`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissReport {
    #[serde(default)]
    pub illegal_generic_types: Vec<String>,
    #[serde(default)]
    pub illegal_generic_methods: Vec<String>,
    #[serde(default)]
    pub illegal_parameter_generic_types: Vec<String>,
    #[serde(default)]
    pub illegal_extensions: Vec<String>,
    #[serde(default)]
    pub access_member_of_illegal_generic_types: Vec<String>,
    /// `(source, target)` pairs.
    #[serde(default)]
    pub illegal_conversions: Vec<(String, String)>,
}

impl MissReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.illegal_generic_types.len()
            + self.illegal_generic_methods.len()
            + self.illegal_parameter_generic_types.len()
            + self.illegal_extensions.len()
            + self.access_member_of_illegal_generic_types.len()
            + self.illegal_conversions.len()
    }

    /// Render the misses under the legal-list keys.
    ///
    /// Member-host misses join the generic-type list. Method names are split
    /// at their last `.` into `method(type, name)`. Empty lists are omitted.
    #[must_use]
    pub fn to_rule_document(&self) -> RuleDocument {
        let types = |names: &[String]| -> Vec<RuleEntry> {
            names.iter().map(|n| RuleEntry::new("type", &[n.as_str()])).collect()
        };

        let mut generic_types: Vec<String> = self
            .illegal_generic_types
            .iter()
            .chain(&self.access_member_of_illegal_generic_types)
            .cloned()
            .collect();
        generic_types.sort();
        generic_types.dedup();

        let methods: Vec<RuleEntry> = self
            .illegal_generic_methods
            .iter()
            .filter_map(|name| {
                let (ty, method) = name.rsplit_once('.')?;
                Some(RuleEntry::new("method", &[ty, method]))
            })
            .collect();

        let conversions: Vec<RuleEntry> = self
            .illegal_conversions
            .iter()
            .map(|(src, dst)| RuleEntry::new("convertion", &[src.as_str(), dst.as_str()]))
            .collect();

        let sections = [
            (RuleList::LegalGenericTypes, types(&generic_types)),
            (RuleList::LegalGenericMethods, methods),
            (
                RuleList::LegalParameterGenericTypes,
                types(&self.illegal_parameter_generic_types),
            ),
            (RuleList::LegalExtensions, types(&self.illegal_extensions)),
            (RuleList::LegalConversions, conversions),
        ];

        RuleDocument {
            sections: sections
                .into_iter()
                .filter(|(_, entries)| !entries.is_empty())
                .map(|(list, entries)| RuleSection::config(list, entries))
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/misses_tests.rs"]
mod tests;
