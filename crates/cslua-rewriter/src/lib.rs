//! Portability pre-pass over one resolved compilation unit.
//!
//! The pass runs in two steps:
//! 1. `TreeRewriter` walks the tree once, shortening names that spell a known
//!    namespace and attaching a diagnostic wherever the unit uses an extern
//!    symbol, a conversion or a construct the Lua back end cannot express.
//! 2. `flatten` pulls the members of every namespace under the configured
//!    root into the compilation unit itself.
//!
//! Legality questions are answered by `SymbolClassifier` against a
//! `RuleTable`; invocation arguments are lined up with their parameters by
//! `arguments::plan`.

pub mod arguments;
pub mod classifier;
pub mod flatten;
pub mod namespaces;
pub mod rewriter;
pub mod sink;

pub use arguments::{ArgumentPlan, ArgumentSlot};
pub use classifier::{SymbolClassifier, TypePosition};
pub use flatten::flatten;
pub use namespaces::KnownNamespaces;
pub use rewriter::{RewriteOutput, TreeRewriter, rewrite_unit};
pub use sink::{DiagnosticSink, NullSink, TracingSink};
