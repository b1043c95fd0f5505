//! The two analysis passes over C9 source units.
//!
//! The symbol pass (extract + resolve) and the style pass (rules) share no
//! state; within one file, resolution runs strictly after extraction.

pub mod extract;
pub mod resolve;
pub mod rules;
mod runner;
mod source;
mod types;

pub use extract::{extract, Definition, DefinitionKind, FileFacts, Usage, UsageContext};
pub use resolve::resolve;
pub use rules::{known_rule_ids, RuleCatalog, RulePattern, RuleSpec, DEFAULT_MIN_NAME_LEN};
pub use runner::Runner;
pub use source::SourceUnit;
pub use types::{CheckError, FactsSummary, FileReport, Finding, FindingKind, Severity};
