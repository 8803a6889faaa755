//! Policy lookups that record their misses.

use crate::misses::{MissBucket, MissLog};
use crate::policy::{DenyList, LegalList, RulePolicy};

/// Borrowed view over an immutable policy and the run's miss log.
#[derive(Copy, Clone, Debug)]
pub struct RuleTable<'a> {
    policy: &'a RulePolicy,
    misses: &'a MissLog,
}

impl<'a> RuleTable<'a> {
    #[must_use]
    pub const fn new(policy: &'a RulePolicy, misses: &'a MissLog) -> Self {
        Self { policy, misses }
    }

    #[must_use]
    pub const fn policy(&self) -> &'a RulePolicy {
        self.policy
    }

    #[must_use]
    pub const fn misses(&self) -> &'a MissLog {
        self.misses
    }

    /// Bucket a miss against `list` lands in.
    #[must_use]
    pub const fn mirror(list: LegalList) -> MissBucket {
        match list {
            LegalList::GenericType => MissBucket::IllegalGenericType,
            LegalList::GenericMethod => MissBucket::IllegalGenericMethod,
            LegalList::ParameterGenericType => MissBucket::IllegalParameterGenericType,
            LegalList::Extension => MissBucket::IllegalExtension,
        }
    }

    /// `true` if `name` is listed; otherwise the name is recorded as a miss.
    pub fn query_legal(&self, list: LegalList, name: &str) -> bool {
        self.query_legal_into(list, name, None, Self::mirror(list))
    }

    /// Try `bare`, then `extended`. On a miss only the last name tried is
    /// recorded, into `bucket`.
    pub fn query_legal_into(
        &self,
        list: LegalList,
        bare: &str,
        extended: Option<&str>,
        bucket: MissBucket,
    ) -> bool {
        if self.policy.contains(list, bare) {
            return true;
        }
        let last = match extended {
            Some(extended) if extended != bare => {
                if self.policy.contains(list, extended) {
                    return true;
                }
                extended
            }
            _ => bare,
        };
        self.misses.record(bucket, last);
        false
    }

    /// Deny-list lookups never record.
    #[must_use]
    pub fn denies(&self, list: DenyList, name: &str) -> bool {
        self.policy.denies(list, name)
    }

    /// `true` if any bare/extended combination of the pair is listed.
    ///
    /// Pairs are tried bare-first on both sides; on failure the most specific
    /// pair (extended names where given) is recorded.
    pub fn lookup_conversion(
        &self,
        source: &str,
        source_extended: Option<&str>,
        target: &str,
        target_extended: Option<&str>,
    ) -> bool {
        let sources = [Some(source), source_extended.filter(|s| *s != source)];
        let targets = [Some(target), target_extended.filter(|t| *t != target)];

        for src in sources.iter().flatten() {
            if self.policy.conversion_targets(src).is_none() {
                continue;
            }
            if targets
                .iter()
                .flatten()
                .any(|dst| self.policy.contains_conversion(src, dst))
            {
                return true;
            }
        }

        let src = source_extended.unwrap_or(source);
        let dst = target_extended.unwrap_or(target);
        self.misses.record_conversion(src, dst);
        false
    }
}

#[cfg(test)]
#[path = "../tests/table_tests.rs"]
mod tests;
