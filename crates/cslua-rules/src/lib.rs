//! Rule engine inputs for the cslua portability pre-pass.
//!
//! - `naming` - canonical string keys for types, members and instantiations
//! - `document` - the structured rule document (`rewriter.json`)
//! - `policy` - the immutable policy built from a document
//! - `misses` - the concurrent miss log and its report
//! - `table` - `RuleTable`, the policy + miss log pair the classifier queries
//!
//! The policy never changes after loading. Every failed legality query is
//! recorded into the miss log instead, so a batch run leaves behind the exact
//! set of canonical names a maintainer may want to whitelist.

pub mod document;
pub mod misses;
pub mod naming;
pub mod policy;
pub mod table;

pub use document::{RULE_FILE_NAME, RuleDocument, RuleEntry, RuleError, RuleList, RuleSection};
pub use misses::{MissBucket, MissLog, MissReport};
pub use naming::{canonical_name, extended_name, member_key, name_with_type_parameters};
pub use policy::{DenyList, LegalList, RulePolicy};
pub use table::RuleTable;
