//! Immutable rule policy built from a `RuleDocument`.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::document::{RuleDocument, RuleEntry, RuleList};

/// Lists of names that are allowed when extern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LegalList {
    GenericType,
    GenericMethod,
    ParameterGenericType,
    Extension,
}

/// Lists of extern names that are configured as unusable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DenyList {
    Type,
    Method,
    Property,
    Field,
}

#[derive(Clone, Debug, Default)]
pub struct RulePolicy {
    generic_types: FxHashSet<String>,
    generic_methods: FxHashSet<String>,
    parameter_generic_types: FxHashSet<String>,
    extensions: FxHashSet<String>,
    conversions: FxHashMap<String, FxHashSet<String>>,
    illegal_types: FxHashSet<String>,
    illegal_methods: FxHashSet<String>,
    illegal_properties: FxHashSet<String>,
    illegal_fields: FxHashSet<String>,
}

impl RulePolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_document(document: &RuleDocument) -> Self {
        let mut policy = Self::default();
        for section in &document.sections {
            let Some(list) = section.list() else {
                continue;
            };
            for entry in section.entries_for(list) {
                policy.insert_entry(list, &entry);
            }
        }
        debug!(
            generic_types = policy.generic_types.len(),
            generic_methods = policy.generic_methods.len(),
            conversions = policy.conversions.len(),
            illegal = policy.illegal_types.len()
                + policy.illegal_methods.len()
                + policy.illegal_properties.len()
                + policy.illegal_fields.len(),
            "built rule policy"
        );
        policy
    }

    fn insert_entry(&mut self, list: RuleList, entry: &RuleEntry) {
        let first = entry.args[0].as_str();
        let member = || format!("{first}.{}", entry.args[1]);
        match list {
            RuleList::LegalGenericTypes => self.allow(LegalList::GenericType, first),
            RuleList::LegalGenericMethods => self.allow(LegalList::GenericMethod, &member()),
            RuleList::LegalParameterGenericTypes => {
                self.allow(LegalList::ParameterGenericType, first);
            }
            RuleList::LegalExtensions => self.allow(LegalList::Extension, first),
            RuleList::LegalConversions => self.allow_conversion(first, &entry.args[1]),
            RuleList::IllegalTypes => self.deny(DenyList::Type, first),
            RuleList::IllegalMethods => self.deny(DenyList::Method, &member()),
            RuleList::IllegalProperties => self.deny(DenyList::Property, &member()),
            RuleList::IllegalFields => self.deny(DenyList::Field, &member()),
        }
    }

    const fn legal_set(&self, list: LegalList) -> &FxHashSet<String> {
        match list {
            LegalList::GenericType => &self.generic_types,
            LegalList::GenericMethod => &self.generic_methods,
            LegalList::ParameterGenericType => &self.parameter_generic_types,
            LegalList::Extension => &self.extensions,
        }
    }

    fn legal_set_mut(&mut self, list: LegalList) -> &mut FxHashSet<String> {
        match list {
            LegalList::GenericType => &mut self.generic_types,
            LegalList::GenericMethod => &mut self.generic_methods,
            LegalList::ParameterGenericType => &mut self.parameter_generic_types,
            LegalList::Extension => &mut self.extensions,
        }
    }

    const fn deny_set(&self, list: DenyList) -> &FxHashSet<String> {
        match list {
            DenyList::Type => &self.illegal_types,
            DenyList::Method => &self.illegal_methods,
            DenyList::Property => &self.illegal_properties,
            DenyList::Field => &self.illegal_fields,
        }
    }

    fn deny_set_mut(&mut self, list: DenyList) -> &mut FxHashSet<String> {
        match list {
            DenyList::Type => &mut self.illegal_types,
            DenyList::Method => &mut self.illegal_methods,
            DenyList::Property => &mut self.illegal_properties,
            DenyList::Field => &mut self.illegal_fields,
        }
    }

    pub fn allow(&mut self, list: LegalList, name: &str) {
        self.legal_set_mut(list).insert(name.to_string());
    }

    pub fn deny(&mut self, list: DenyList, name: &str) {
        self.deny_set_mut(list).insert(name.to_string());
    }

    pub fn allow_conversion(&mut self, source: &str, target: &str) {
        self.conversions
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string());
    }

    #[must_use]
    pub fn contains(&self, list: LegalList, name: &str) -> bool {
        self.legal_set(list).contains(name)
    }

    #[must_use]
    pub fn denies(&self, list: DenyList, name: &str) -> bool {
        self.deny_set(list).contains(name)
    }

    #[must_use]
    pub fn conversion_targets(&self, source: &str) -> Option<&FxHashSet<String>> {
        self.conversions.get(source)
    }

    #[must_use]
    pub fn contains_conversion(&self, source: &str, target: &str) -> bool {
        self.conversions
            .get(source)
            .is_some_and(|targets| targets.contains(target))
    }
}

#[cfg(test)]
#[path = "../tests/policy_tests.rs"]
mod tests;
