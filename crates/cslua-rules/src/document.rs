//! Structured rule document.
//!
//! The rule file is a JSON array of tagged sections. Only `config` sections
//! are meaningful; their first argument names the list they populate:
//!
//! ```json
//! [
//!   { "id": "config", "args": ["LegalGenericTypeList"], "entries": [
//!       { "id": "type", "args": ["System.Collections.Generic.List_T"] }
//!   ]},
//!   { "id": "config", "args": ["IllegalMethodList"], "entries": [
//!       { "id": "method", "args": ["UnityEngine.GameObject", "SendMessage"] }
//!   ]}
//! ]
//! ```
//!
//! Unknown or malformed sections, unknown lists and malformed entries are
//! ignored; a missing name in a list is a policy miss, not a load failure.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// File name the rule document is loaded from inside a configuration directory.
pub const RULE_FILE_NAME: &str = "rewriter.json";

/// Section id whose sections carry rule lists.
pub const CONFIG_SECTION: &str = "config";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleDocument {
    pub sections: Vec<RuleSection>,
}

/// The top level must be an array; a section that does not have the section
/// shape is skipped like a malformed entry.
impl<'de> Deserialize<'de> for RuleDocument {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
        let sections = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RuleSection>(value) {
                Ok(section) => Some(section),
                Err(err) => {
                    trace!(%err, "skipping malformed rule section");
                    None
                }
            })
            .collect();
        Ok(Self { sections })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSection {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Kept untyped so one bad entry cannot reject the whole document.
    #[serde(default)]
    pub entries: Vec<serde_json::Value>,
}

/// One `tag(arg, ...)` entry of a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub id: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl RuleEntry {
    #[must_use]
    pub fn new(id: &str, args: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

/// The lists a `config` section can populate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuleList {
    LegalGenericTypes,
    LegalGenericMethods,
    LegalParameterGenericTypes,
    LegalExtensions,
    LegalConversions,
    IllegalTypes,
    IllegalMethods,
    IllegalProperties,
    IllegalFields,
}

impl RuleList {
    pub const ALL: [Self; 9] = [
        Self::LegalGenericTypes,
        Self::LegalGenericMethods,
        Self::LegalParameterGenericTypes,
        Self::LegalExtensions,
        Self::LegalConversions,
        Self::IllegalTypes,
        Self::IllegalMethods,
        Self::IllegalProperties,
        Self::IllegalFields,
    ];

    /// Section key as spelled in rule files.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::LegalGenericTypes => "LegalGenericTypeList",
            Self::LegalGenericMethods => "LegalGenericMethodList",
            Self::LegalParameterGenericTypes => "LegalParameterGenericTypeList",
            Self::LegalExtensions => "LegalExtensionList",
            Self::LegalConversions => "LegalConvertionList",
            Self::IllegalTypes => "IllegalTypeList",
            Self::IllegalMethods => "IllegalMethodList",
            Self::IllegalProperties => "IllegalPropertyList",
            Self::IllegalFields => "IllegalFieldList",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|list| list.key() == key)
    }

    /// Entry tag the list accepts, and how many arguments it takes.
    #[must_use]
    pub const fn entry_shape(self) -> (&'static str, usize) {
        match self {
            Self::LegalGenericTypes
            | Self::LegalParameterGenericTypes
            | Self::LegalExtensions
            | Self::IllegalTypes => ("type", 1),
            Self::LegalGenericMethods | Self::IllegalMethods => ("method", 2),
            Self::LegalConversions => ("convertion", 2),
            Self::IllegalProperties => ("property", 2),
            Self::IllegalFields => ("field", 2),
        }
    }
}

impl RuleSection {
    #[must_use]
    pub fn config(list: RuleList, entries: Vec<RuleEntry>) -> Self {
        Self {
            id: CONFIG_SECTION.to_string(),
            args: vec![list.key().to_string()],
            entries: entries
                .into_iter()
                .filter_map(|e| serde_json::to_value(e).ok())
                .collect(),
        }
    }

    /// The list a `config` section populates; `None` for anything else.
    #[must_use]
    pub fn list(&self) -> Option<RuleList> {
        if self.id != CONFIG_SECTION {
            return None;
        }
        RuleList::from_key(self.args.first()?)
    }

    /// Well-formed entries matching the list's tag and arity.
    pub fn entries_for(&self, list: RuleList) -> impl Iterator<Item = RuleEntry> + '_ {
        let (tag, arity) = list.entry_shape();
        self.entries.iter().filter_map(move |value| {
            let entry: RuleEntry = match serde_json::from_value(value.clone()) {
                Ok(entry) => entry,
                Err(err) => {
                    trace!(list = list.key(), %err, "skipping malformed rule entry");
                    return None;
                }
            };
            (entry.id == tag && entry.args.len() >= arity).then_some(entry)
        })
    }
}

#[derive(Debug)]
pub enum RuleError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: Option<PathBuf>, source: serde_json::Error },
}

impl std::fmt::Display for RuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read rule file '{}': {source}", path.display())
            }
            Self::Json {
                path: Some(path),
                source,
            } => write!(f, "malformed rule file '{}': {source}", path.display()),
            Self::Json { path: None, source } => write!(f, "malformed rule document: {source}"),
        }
    }
}

impl std::error::Error for RuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl RuleDocument {
    pub fn from_json_str(text: &str) -> Result<Self, RuleError> {
        serde_json::from_str(text).map_err(|source| RuleError::Json { path: None, source })
    }

    pub fn load(path: &Path) -> Result<Self, RuleError> {
        let text = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Self = serde_json::from_str(&text).map_err(|source| RuleError::Json {
            path: Some(path.to_path_buf()),
            source,
        })?;
        debug!(
            path = %path.display(),
            sections = document.sections.len(),
            "loaded rule document"
        );
        Ok(document)
    }

    /// Load `rewriter.json` from a configuration directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self, RuleError> {
        Self::load(&dir.join(RULE_FILE_NAME))
    }

    pub fn to_json_pretty(&self) -> Result<String, RuleError> {
        serde_json::to_string_pretty(self).map_err(|source| RuleError::Json { path: None, source })
    }
}

#[cfg(test)]
#[path = "../tests/document_tests.rs"]
mod tests;
